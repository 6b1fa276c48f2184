//! Summary statistics for a loaded graph.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::Graph;

/// Counts and distributions reported to the host after each load.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
	/// Node count.
	pub total_nodes: usize,
	/// Edge count.
	pub total_edges: usize,
	/// Mean distinct-neighbor count.
	pub average_degree: f64,
	/// Mean edge weight; zero without edges.
	pub average_edge_weight: f64,
	/// Nodes per entity type name.
	pub entity_type_distribution: BTreeMap<String, usize>,
	/// Edges per relationship name.
	pub relation_type_distribution: BTreeMap<String, usize>,
	/// `edges / (n (n - 1) / 2)`; zero for fewer than two nodes.
	pub density: f64,
}

impl GraphStats {
	/// Statistics for `graph`.
	pub fn compute(graph: &Graph) -> Self {
		let n = graph.node_count();
		let m = graph.edge_count();

		let mut entity_type_distribution = BTreeMap::new();
		for node in graph.nodes() {
			*entity_type_distribution
				.entry(node.entity_type.as_str().to_string())
				.or_insert(0) += 1;
		}
		let mut relation_type_distribution = BTreeMap::new();
		for edge in graph.edges() {
			*relation_type_distribution
				.entry(edge.relation_type.clone())
				.or_insert(0) += 1;
		}

		let degree_sum: usize = (0..n).map(|idx| graph.degree(idx)).sum();
		let weight_sum: f64 = graph.edges().iter().map(|e| e.weight).sum();

		Self {
			total_nodes: n,
			total_edges: m,
			average_degree: mean(degree_sum as f64, n),
			average_edge_weight: mean(weight_sum, m),
			entity_type_distribution,
			relation_type_distribution,
			density: if n > 1 {
				m as f64 / (n as f64 * (n as f64 - 1.0) / 2.0)
			} else {
				0.0
			},
		}
	}
}

fn mean(sum: f64, count: usize) -> f64 {
	if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	#[test]
	fn computes_counts_distributions_and_density() {
		let graph = Graph::load(&GraphData {
			nodes: vec![
				GraphNode::new("ann").with_type("PERSON"),
				GraphNode::new("bob").with_type("person"),
				GraphNode::new("acme").with_type("ORGANIZATION"),
				GraphNode::new("x"),
			],
			edges: vec![
				GraphEdge::new("e1", "ann", "acme").with_relation("works_for").with_weight(1.0),
				GraphEdge::new("e2", "bob", "acme").with_relation("works_for").with_weight(0.5),
				GraphEdge::new("e3", "ann", "bob"),
			],
		})
		.unwrap();
		let stats = GraphStats::compute(&graph);

		assert_eq!(stats.total_nodes, 4);
		assert_eq!(stats.total_edges, 3);
		assert_eq!(stats.entity_type_distribution["PERSON"], 2);
		assert_eq!(stats.entity_type_distribution["default"], 1);
		assert_eq!(stats.relation_type_distribution["works_for"], 2);
		assert_eq!(stats.relation_type_distribution["related_to"], 1);
		assert!((stats.average_degree - 1.5).abs() < 1e-9);
		assert!((stats.average_edge_weight - (1.0 + 0.5 + 0.7) / 3.0).abs() < 1e-9);
		assert!((stats.density - 0.5).abs() < 1e-9);
	}

	#[test]
	fn empty_and_single_node_graphs_have_zero_ratios() {
		let empty = GraphStats::compute(&Graph::default());
		assert_eq!(empty, GraphStats::default());

		let one = Graph::load(&GraphData {
			nodes: vec![GraphNode::new("solo")],
			edges: vec![],
		})
		.unwrap();
		let stats = GraphStats::compute(&one);
		assert_eq!(stats.density, 0.0);
		assert_eq!(stats.average_edge_weight, 0.0);
	}

	#[test]
	fn serializes_with_camel_case_keys() {
		let json = serde_json::to_value(GraphStats::default()).unwrap();
		assert!(json.get("totalNodes").is_some());
		assert!(json.get("relationTypeDistribution").is_some());
	}
}
