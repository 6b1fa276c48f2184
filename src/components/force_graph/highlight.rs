//! Selection and search highlighting.
//!
//! Selecting a node keeps it, its direct neighbors and its incident edges at
//! full opacity and dims everything else. A search query further restricts
//! full opacity to nodes whose label contains the query. Highlighting is
//! purely visual: it never feeds back into the simulation or the graph.

use std::collections::HashSet;

use serde::Deserialize;

use super::model::{EdgeIdx, Graph, NodeIdx};

/// Full opacity for highlighted or unfiltered elements.
pub const FULL_OPACITY: f64 = 1.0;

/// Opacity levels for dimmed elements.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightConfig {
	/// Opacity of nodes outside the focus.
	pub dim_node_opacity: f64,
	/// Opacity of labels outside the focus.
	pub dim_label_opacity: f64,
	/// Edges outnumber nodes, so they fade further.
	pub dim_edge_opacity: f64,
}

impl Default for HighlightConfig {
	fn default() -> Self {
		Self {
			dim_node_opacity: 0.2,
			dim_label_opacity: 0.2,
			dim_edge_opacity: 0.08,
		}
	}
}

/// Why an element is drawn the way it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// No selection or search affects it.
	Normal,
	/// The selected node itself.
	Selected,
	/// Directly connected to the selected node (edges: incident to it).
	Neighbor,
	/// Matches the search with no selection active.
	Match,
	/// Outside the selection focus or the search matches.
	Dimmed,
}

/// Per-element visual directive consumed by the scene builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
	/// Multiplier applied to the element's base alpha.
	pub opacity: f64,
	/// Reason for the opacity.
	pub emphasis: Emphasis,
}

impl VisualState {
	const fn full(emphasis: Emphasis) -> Self {
		Self {
			opacity: FULL_OPACITY,
			emphasis,
		}
	}
}

#[derive(Clone, Debug)]
struct Selection {
	node: NodeIdx,
	neighbors: HashSet<NodeIdx>,
	edges: HashSet<EdgeIdx>,
}

#[derive(Clone, Debug)]
struct Search {
	query: String,
	matches: HashSet<NodeIdx>,
}

/// Highlight state for one graph.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	config: HighlightConfig,
	selection: Option<Selection>,
	search: Option<Search>,
}

impl Highlight {
	/// Empty highlight state with the given dimming levels.
	pub fn new(config: HighlightConfig) -> Self {
		Self {
			config,
			selection: None,
			search: None,
		}
	}

	/// Select `node`, deriving its neighborhood from the adjacency index.
	/// Unknown nodes leave the current state untouched.
	pub fn select(&mut self, graph: &Graph, node: NodeIdx) -> bool {
		if graph.node(node).is_none() {
			return false;
		}
		let neighbors = graph.neighbor_nodes(node).filter(|&n| n != node).collect();
		let edges = graph.incident_edges(node).iter().copied().collect();
		self.selection = Some(Selection {
			node,
			neighbors,
			edges,
		});
		true
	}

	/// Drop the selection. Returns whether one existed.
	pub fn clear(&mut self) -> bool {
		self.selection.take().is_some()
	}

	/// Currently selected node.
	pub fn selected(&self) -> Option<NodeIdx> {
		self.selection.as_ref().map(|s| s.node)
	}

	/// Restrict highlighting to labels containing `query` (case-insensitive).
	/// A blank query removes the filter.
	pub fn set_search(&mut self, graph: &Graph, query: &str) {
		let query = query.trim();
		if query.is_empty() {
			self.search = None;
			return;
		}
		let needle = query.to_lowercase();
		let matches = graph
			.nodes()
			.iter()
			.enumerate()
			.filter(|(_, n)| n.label.to_lowercase().contains(&needle))
			.map(|(idx, _)| idx)
			.collect();
		self.search = Some(Search {
			query: query.to_string(),
			matches,
		});
	}

	/// Active search query, trimmed.
	pub fn search_query(&self) -> Option<&str> {
		self.search.as_ref().map(|s| s.query.as_str())
	}

	/// Number of nodes matching the active search.
	pub fn match_count(&self) -> Option<usize> {
		self.search.as_ref().map(|s| s.matches.len())
	}

	/// Forget everything; used when a new graph replaces the old one.
	pub fn reset(&mut self) {
		self.selection = None;
		self.search = None;
	}

	/// Selection or search is in effect.
	pub fn is_active(&self) -> bool {
		self.selection.is_some() || self.search.is_some()
	}

	fn matches(&self, node: NodeIdx) -> bool {
		self.search.as_ref().is_none_or(|s| s.matches.contains(&node))
	}

	/// Visual state of node `node`.
	pub fn node_visual(&self, node: NodeIdx) -> VisualState {
		let emphasis = match &self.selection {
			Some(sel) if sel.node == node => Emphasis::Selected,
			Some(sel) if sel.neighbors.contains(&node) => Emphasis::Neighbor,
			Some(_) => return self.dim_node(),
			None if self.search.is_some() => Emphasis::Match,
			None => Emphasis::Normal,
		};
		if self.matches(node) {
			VisualState::full(emphasis)
		} else {
			self.dim_node()
		}
	}

	/// Label opacity of node `node`.
	pub fn label_opacity(&self, node: NodeIdx) -> f64 {
		if self.node_visual(node).emphasis == Emphasis::Dimmed {
			self.config.dim_label_opacity
		} else {
			FULL_OPACITY
		}
	}

	/// Visual state of edge `edge`.
	pub fn edge_visual(&self, graph: &Graph, edge: EdgeIdx) -> VisualState {
		let Some(e) = graph.edge(edge) else {
			return self.dim_edge();
		};
		let emphasis = match &self.selection {
			Some(sel) if sel.edges.contains(&edge) => Emphasis::Neighbor,
			Some(_) => return self.dim_edge(),
			None if self.search.is_some() => Emphasis::Match,
			None => Emphasis::Normal,
		};
		if self.matches(e.source) && self.matches(e.target) {
			VisualState::full(emphasis)
		} else {
			self.dim_edge()
		}
	}

	fn dim_node(&self) -> VisualState {
		VisualState {
			opacity: self.config.dim_node_opacity,
			emphasis: Emphasis::Dimmed,
		}
	}

	fn dim_edge(&self) -> VisualState {
		VisualState {
			opacity: self.config.dim_edge_opacity,
			emphasis: Emphasis::Dimmed,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	fn abcd() -> Graph {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a").with_label("Ada Lovelace"),
				GraphNode::new("b").with_label("Analytical Engine"),
				GraphNode::new("c").with_label("Charles Babbage"),
				GraphNode::new("d").with_label("London"),
			],
			edges: vec![
				GraphEdge::new("e1", "a", "b").with_weight(0.9),
				GraphEdge::new("e2", "b", "c").with_weight(0.5),
			],
		};
		Graph::load(&data).unwrap()
	}

	fn idx(graph: &Graph, id: &str) -> NodeIdx {
		graph.node_index(id).unwrap()
	}

	fn all_visuals(graph: &Graph, h: &Highlight) -> (Vec<VisualState>, Vec<VisualState>, Vec<f64>) {
		(
			(0..graph.node_count()).map(|n| h.node_visual(n)).collect(),
			(0..graph.edge_count()).map(|e| h.edge_visual(graph, e)).collect(),
			(0..graph.node_count()).map(|n| h.label_opacity(n)).collect(),
		)
	}

	#[test]
	fn selecting_middle_node_keeps_neighbors_and_dims_the_rest() {
		let graph = abcd();
		let mut h = Highlight::default();
		assert!(h.select(&graph, idx(&graph, "b")));

		assert_eq!(h.node_visual(idx(&graph, "b")).emphasis, Emphasis::Selected);
		assert_eq!(h.node_visual(idx(&graph, "a")).opacity, FULL_OPACITY);
		assert_eq!(h.node_visual(idx(&graph, "c")).opacity, FULL_OPACITY);
		assert_eq!(h.node_visual(idx(&graph, "c")).emphasis, Emphasis::Neighbor);

		let d = h.node_visual(idx(&graph, "d"));
		assert_eq!(d.emphasis, Emphasis::Dimmed);
		assert_eq!(d.opacity, HighlightConfig::default().dim_node_opacity);
		assert_eq!(h.label_opacity(idx(&graph, "d")), HighlightConfig::default().dim_label_opacity);

		for e in 0..graph.edge_count() {
			assert_eq!(h.edge_visual(&graph, e).opacity, FULL_OPACITY);
		}
	}

	#[test]
	fn selecting_leaf_dims_non_incident_edges_more_than_nodes() {
		let graph = abcd();
		let mut h = Highlight::default();
		h.select(&graph, idx(&graph, "a"));
		assert!(graph.find_edge("e2").is_some());
		let dimmed_edge = h.edge_visual(&graph, 1);
		assert_eq!(dimmed_edge.emphasis, Emphasis::Dimmed);
		assert!(dimmed_edge.opacity < h.node_visual(idx(&graph, "c")).opacity);
		assert_eq!(h.node_visual(idx(&graph, "c")).emphasis, Emphasis::Dimmed);
	}

	#[test]
	fn clear_restores_pre_selection_state_exactly() {
		let graph = abcd();
		let mut h = Highlight::default();
		let before = all_visuals(&graph, &h);
		h.select(&graph, idx(&graph, "b"));
		assert_ne!(all_visuals(&graph, &h), before);
		assert!(h.clear());
		assert_eq!(all_visuals(&graph, &h), before);
		assert!(!h.clear());
		for v in before.0.iter().chain(before.1.iter()) {
			assert_eq!(v.opacity.to_bits(), FULL_OPACITY.to_bits());
		}
	}

	#[test]
	fn unknown_selection_is_ignored() {
		let graph = abcd();
		let mut h = Highlight::default();
		h.select(&graph, 0);
		assert!(!h.select(&graph, 42));
		assert_eq!(h.selected(), Some(0));
	}

	#[test]
	fn search_matches_labels_case_insensitively() {
		let graph = abcd();
		let mut h = Highlight::default();
		h.set_search(&graph, "  BABB ");
		assert_eq!(h.search_query(), Some("BABB"));
		assert_eq!(h.match_count(), Some(1));
		assert_eq!(h.node_visual(idx(&graph, "c")).emphasis, Emphasis::Match);
		assert_eq!(h.node_visual(idx(&graph, "a")).emphasis, Emphasis::Dimmed);
		// Neither edge has both endpoints matching.
		assert_eq!(h.edge_visual(&graph, 1).emphasis, Emphasis::Dimmed);

		h.set_search(&graph, "a");
		// "Ada", "Analytical", "Charles Babbage" contain an "a"; "London" does not.
		assert_eq!(h.match_count(), Some(3));
		assert_eq!(h.edge_visual(&graph, 0).opacity, FULL_OPACITY);

		h.set_search(&graph, "   ");
		assert!(h.search_query().is_none());
		assert!(!h.is_active());
	}

	#[test]
	fn search_restricts_selection_highlight() {
		let graph = abcd();
		let mut h = Highlight::default();
		h.select(&graph, idx(&graph, "b"));
		h.set_search(&graph, "ada");
		assert_eq!(h.node_visual(idx(&graph, "a")).opacity, FULL_OPACITY);
		assert_eq!(h.node_visual(idx(&graph, "c")).emphasis, Emphasis::Dimmed);
		// The selected node itself does not match "ada".
		assert_eq!(h.node_visual(idx(&graph, "b")).emphasis, Emphasis::Dimmed);
		assert_eq!(h.edge_visual(&graph, 0).emphasis, Emphasis::Dimmed);

		h.reset();
		assert!(!h.is_active());
		assert_eq!(h.node_visual(idx(&graph, "d")).emphasis, Emphasis::Normal);
	}
}
