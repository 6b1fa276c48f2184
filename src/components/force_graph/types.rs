//! Graph payload structures received from the upstream graph data service.
//!
//! Field names follow the camelCase contract; the snake_case names emitted by
//! the graph API are accepted as aliases.

use serde::{Deserialize, Serialize};

/// An entity in the incoming payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Display text. Falls back to the id when absent.
	#[serde(default)]
	pub label: Option<String>,
	/// Entity type name, e.g. `"PERSON"`. Unknown names map to the default type.
	#[serde(default, alias = "type")]
	pub entity_type: Option<String>,
	/// Render and collision radius. Derived from degree when absent.
	#[serde(default)]
	pub size: Option<f64>,
}

/// A directed, typed relationship between two entities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
	/// Edge identifier. Synthesized from the endpoints when absent.
	#[serde(default)]
	pub id: Option<String>,
	/// Source node ID.
	#[serde(alias = "source")]
	pub source_id: String,
	/// Target node ID.
	#[serde(alias = "target")]
	pub target_id: String,
	/// Free-form relation label, e.g. `"works_for"`.
	#[serde(default, alias = "relation_type")]
	pub relation_type: Option<String>,
	/// Pull strength in `(0, 1]`.
	#[serde(default)]
	pub weight: Option<f64>,
}

/// Complete graph payload: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Entities.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Relationships; `links` is accepted as an alias.
	#[serde(default, alias = "links")]
	pub edges: Vec<GraphEdge>,
}

impl GraphNode {
	/// Node with only an id; the remaining fields take their defaults.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	/// Set the display label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set the entity type name.
	pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
		self.entity_type = Some(entity_type.into());
		self
	}

	/// Set the radius.
	pub fn with_size(mut self, size: f64) -> Self {
		self.size = Some(size);
		self
	}
}

impl GraphEdge {
	/// Edge `id` from `source` to `target`.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			source_id: source.into(),
			target_id: target.into(),
			..Self::default()
		}
	}

	/// Set the relationship name.
	pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
		self.relation_type = Some(relation.into());
		self
	}

	/// Set the weight.
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}
}

impl GraphData {
	/// Parse a JSON payload of the form `{ "nodes": [...], "edges": [...] }`.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

/// Graph input handed to the view: already parsed, or raw JSON text that is
/// parsed at load time so a malformed payload is reported with its reason.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphSource {
	/// Parsed payload.
	Data(GraphData),
	/// Unparsed `{ "nodes": [...], "edges": [...] }` text.
	Json(String),
}

impl From<GraphData> for GraphSource {
	fn from(data: GraphData) -> Self {
		GraphSource::Data(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_camel_case_payload() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [{"id": "a", "label": "Alice", "entityType": "PERSON", "size": 12}],
				"edges": [{"id": "e1", "sourceId": "a", "targetId": "a", "relationType": "knows", "weight": 0.4}]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].entity_type.as_deref(), Some("PERSON"));
		assert_eq!(data.nodes[0].size, Some(12.0));
		assert_eq!(data.edges[0].relation_type.as_deref(), Some("knows"));
		assert_eq!(data.edges[0].weight, Some(0.4));
	}

	#[test]
	fn accepts_graph_api_aliases() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [{"id": "a", "type": "ORGANIZATION"}, {"id": "b"}],
				"links": [{"source": "a", "target": "b", "relation_type": "part_of"}]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].entity_type.as_deref(), Some("ORGANIZATION"));
		assert_eq!(data.edges[0].source_id, "a");
		assert_eq!(data.edges[0].target_id, "b");
		assert_eq!(data.edges[0].relation_type.as_deref(), Some("part_of"));
		assert!(data.edges[0].id.is_none());
	}

	#[test]
	fn missing_lists_default_to_empty() {
		let data = GraphData::from_json("{}").unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.edges.is_empty());
	}
}
