//! Notifications from the graph view to its host.

use serde::Serialize;

use super::model::{Graph, NodeIdx};
use super::stats::GraphStats;

/// Host-facing description of a selected node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedNode {
	/// Node id from the payload.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Entity type name, e.g. `PERSON`.
	pub entity_type: String,
	/// Distinct neighbor count.
	pub degree: usize,
}

impl SelectedNode {
	/// Snapshot of node `idx`, or `None` if it does not exist.
	pub fn from_graph(graph: &Graph, idx: NodeIdx) -> Option<Self> {
		let node = graph.node(idx)?;
		Some(Self {
			id: node.id.clone(),
			label: node.label.clone(),
			entity_type: node.entity_type.to_string(),
			degree: graph.degree(idx),
		})
	}
}

/// Something the host may want to display or act on.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// The user clicked a node.
	NodeSelected(SelectedNode),
	/// The selection went away (background click, reset or reload).
	SelectionCleared,
	/// A finished export, ready to download.
	ExportRequested { bytes: Vec<u8>, filename: String },
	/// User-visible failure (bad payload, empty export).
	Error(String),
	/// A graph was installed.
	Loaded(GraphStats),
}
