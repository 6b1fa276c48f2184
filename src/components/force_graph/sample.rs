//! Built-in fallback dataset.
//!
//! A small, fixed knowledge graph about a fictional technology company, shown
//! whenever the host supplies no usable payload. It exercises every entity
//! type, a range of weights and one hub node.

use super::types::{GraphData, GraphEdge, GraphNode};

const NODES: [(&str, &str, &str); 12] = [
	("nova", "Nova Systems", "ORGANIZATION"),
	("lena", "Lena Park", "PERSON"),
	("omar", "Omar Haddad", "PERSON"),
	("kai", "Kai Moreno", "PERSON"),
	("berlin", "Berlin", "LOCATION"),
	("austin", "Austin", "LOCATION"),
	("atlas", "Atlas Graph DB", "PRODUCT"),
	("vector", "Vector Search", "CONCEPT"),
	("launch", "Atlas 2.0 Launch", "EVENT"),
	("q3", "Q3 2024", "DATE"),
	("series-b", "$40M Series B", "MONEY"),
	("helix", "Helix Ventures", "ORGANIZATION"),
];

const EDGES: [(&str, &str, &str, f64); 14] = [
	("lena", "nova", "founded", 1.0),
	("omar", "nova", "works_for", 0.9),
	("kai", "nova", "works_for", 0.8),
	("lena", "omar", "collaborates_with", 0.6),
	("nova", "berlin", "headquartered_in", 0.9),
	("nova", "austin", "has_office_in", 0.5),
	("kai", "austin", "located_in", 0.4),
	("nova", "atlas", "develops", 1.0),
	("atlas", "vector", "implements", 0.7),
	("omar", "atlas", "leads", 0.8),
	("atlas", "launch", "released_at", 0.9),
	("launch", "q3", "occurred_on", 0.6),
	("helix", "series-b", "invested", 0.9),
	("series-b", "nova", "funds", 0.9),
];

/// The fallback graph: 12 nodes, 14 edges.
pub fn sample_graph() -> GraphData {
	GraphData {
		nodes: NODES
			.iter()
			.map(|&(id, label, kind)| GraphNode::new(id).with_label(label).with_type(kind))
			.collect(),
		edges: EDGES
			.iter()
			.enumerate()
			.map(|(i, &(source, target, relation, weight))| {
				GraphEdge::new(format!("s{}", i + 1), source, target)
					.with_relation(relation)
					.with_weight(weight)
			})
			.collect(),
	}
}
