//! Error types for graph loading and export.

use thiserror::Error;

/// An edge whose endpoint does not resolve to a node in the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingEdge {
	/// Id of the offending edge.
	pub edge_id: String,
	/// Endpoint id that matched no node.
	pub missing_node_id: String,
}

/// Data-integrity failures detected while loading a payload.
///
/// A failed load never replaces the graph that is currently shown.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ValidationError {
	/// Two nodes share an id
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// Two edges share an id
	#[error("duplicate edge id `{0}`")]
	DuplicateEdge(String),

	/// Node radius is zero, negative or not a number
	#[error("node `{id}` has invalid size {size}; sizes must be positive")]
	InvalidSize { id: String, size: f64 },

	/// Edge weight outside `(0, 1]`
	#[error("edge `{id}` has invalid weight {weight}; weights must be in (0, 1]")]
	InvalidWeight { id: String, weight: f64 },

	/// One or more edges reference nodes that do not exist
	#[error("{} edge(s) reference unknown nodes: {}", .0.len(), describe_dangling(.0))]
	DanglingEdges(Vec<DanglingEdge>),
}

fn describe_dangling(edges: &[DanglingEdge]) -> String {
	edges
		.iter()
		.map(|e| format!("edge `{}` -> missing node `{}`", e.edge_id, e.missing_node_id))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Export failures, surfaced to the user.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ExportError {
	/// Nothing has been drawn yet
	#[error("nothing to export: no graph is loaded")]
	EmptySurface,
}

/// Any failure the graph view reports to its host.
#[derive(Error, Debug)]
pub enum GraphError {
	/// The payload failed validation.
	#[error("invalid graph data: {0}")]
	Validation(#[from] ValidationError),

	/// The export could not be produced.
	#[error("export failed: {0}")]
	Export(#[from] ExportError),

	/// The payload is not valid JSON for [`GraphData`](super::types::GraphData).
	#[error("malformed graph payload: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Result alias for graph view operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dangling_message_names_every_edge() {
		let err = ValidationError::DanglingEdges(vec![
			DanglingEdge {
				edge_id: "e1".into(),
				missing_node_id: "z".into(),
			},
			DanglingEdge {
				edge_id: "e7".into(),
				missing_node_id: "q".into(),
			},
		]);
		let msg = err.to_string();
		assert!(msg.starts_with("2 edge(s)"));
		assert!(msg.contains("edge `e1` -> missing node `z`"));
		assert!(msg.contains("edge `e7` -> missing node `q`"));
	}

	#[test]
	fn graph_error_wraps_sources() {
		let err: GraphError = ExportError::EmptySurface.into();
		assert_eq!(err.to_string(), "export failed: nothing to export: no graph is loaded");
	}
}
