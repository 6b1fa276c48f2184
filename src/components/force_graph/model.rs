//! Normalized entity/relationship store with O(1) lookups.
//!
//! A [`Graph`] is built in one shot from a [`GraphData`] payload and is
//! read-only afterwards. Reloading builds a new graph; nothing is patched in
//! place.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::error::{DanglingEdge, ValidationError};
use super::theme::Color;
use super::types::GraphData;

/// Position of a node in [`Graph::nodes`].
pub type NodeIdx = usize;
/// Position of an edge in [`Graph::edges`].
pub type EdgeIdx = usize;

/// Weight applied to edges that do not carry one.
pub const DEFAULT_WEIGHT: f64 = 0.7;
/// Relation label applied to edges that do not carry one.
pub const DEFAULT_RELATION: &str = "related_to";
/// Smallest radius derived from degree.
pub const MIN_DERIVED_SIZE: f64 = 8.0;
/// Largest radius derived from degree.
pub const MAX_DERIVED_SIZE: f64 = 30.0;

/// Entity vocabulary produced by the extraction pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
	/// A named individual.
	Person,
	/// Company, agency or institution.
	Organization,
	/// Place or region.
	Location,
	/// Something that happened.
	Event,
	/// Abstract idea or topic.
	Concept,
	/// Product or service.
	Product,
	/// Point in time.
	Date,
	/// Monetary amount.
	Money,
	/// Anything outside the vocabulary.
	#[default]
	Other,
}

impl EntityType {
	/// Every entity type, in table order.
	pub const ALL: [EntityType; 9] = [
		EntityType::Person,
		EntityType::Organization,
		EntityType::Location,
		EntityType::Event,
		EntityType::Concept,
		EntityType::Product,
		EntityType::Date,
		EntityType::Money,
		EntityType::Other,
	];

	/// Case-insensitive lookup; anything outside the vocabulary is [`EntityType::Other`].
	pub fn parse(name: &str) -> Self {
		let name = name.trim();
		Self::ALL
			.into_iter()
			.find(|t| t.as_str().eq_ignore_ascii_case(name))
			.unwrap_or_default()
	}

	/// Wire name, e.g. `PERSON`; `default` for [`EntityType::Other`].
	pub fn as_str(self) -> &'static str {
		match self {
			EntityType::Person => "PERSON",
			EntityType::Organization => "ORGANIZATION",
			EntityType::Location => "LOCATION",
			EntityType::Event => "EVENT",
			EntityType::Concept => "CONCEPT",
			EntityType::Product => "PRODUCT",
			EntityType::Date => "DATE",
			EntityType::Money => "MONEY",
			EntityType::Other => "default",
		}
	}

	/// Fixed fill color for each entity type.
	pub const fn color(self) -> Color {
		match self {
			EntityType::Person => Color::rgb(0x3b, 0x82, 0xf6),
			EntityType::Organization => Color::rgb(0x10, 0xb9, 0x81),
			EntityType::Location => Color::rgb(0xf5, 0x9e, 0x0b),
			EntityType::Event => Color::rgb(0x8b, 0x5c, 0xf6),
			EntityType::Concept => Color::rgb(0x06, 0xb6, 0xd4),
			EntityType::Product => Color::rgb(0x84, 0xcc, 0x16),
			EntityType::Date => Color::rgb(0xf9, 0x73, 0x16),
			EntityType::Money => Color::rgb(0x14, 0xb8, 0xa6),
			EntityType::Other => Color::rgb(0x64, 0x74, 0x8b),
		}
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A validated entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique id from the payload.
	pub id: String,
	/// Display label (the id when none was given).
	pub label: String,
	/// Entity type.
	pub entity_type: EntityType,
	/// Fill color for the entity type.
	pub color: Color,
	/// Radius; always positive.
	pub size: f64,
}

/// A validated relationship between two resolved nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Unique id, synthesized when the payload had none.
	pub id: String,
	/// Source node.
	pub source: NodeIdx,
	/// Target node.
	pub target: NodeIdx,
	/// Relationship name.
	pub relation_type: String,
	/// In `(0, 1]`.
	pub weight: f64,
}

/// Loaded graph with id indexes and a precomputed adjacency index.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	node_index: HashMap<String, NodeIdx>,
	edge_index: HashMap<String, EdgeIdx>,
	/// Incident edges per node.
	adjacency: Vec<Vec<EdgeIdx>>,
	/// Distinct neighbor count per node.
	degrees: Vec<usize>,
}

impl Graph {
	/// Validate a payload and build the graph.
	///
	/// All dangling edge endpoints are reported together so the caller can
	/// fix the payload in one pass.
	pub fn load(data: &GraphData) -> Result<Self, ValidationError> {
		let mut node_index = HashMap::with_capacity(data.nodes.len());
		for (idx, node) in data.nodes.iter().enumerate() {
			if node_index.insert(node.id.clone(), idx).is_some() {
				return Err(ValidationError::DuplicateNode(node.id.clone()));
			}
		}

		// Incident edge counts by id, used for sizes the payload leaves out.
		let mut incident: HashMap<&str, usize> = HashMap::new();
		for edge in &data.edges {
			*incident.entry(edge.source_id.as_str()).or_insert(0) += 1;
			*incident.entry(edge.target_id.as_str()).or_insert(0) += 1;
		}

		let mut nodes = Vec::with_capacity(data.nodes.len());
		for node in &data.nodes {
			let size = match node.size {
				Some(size) if size.is_finite() && size > 0.0 => size,
				Some(size) => {
					return Err(ValidationError::InvalidSize {
						id: node.id.clone(),
						size,
					});
				}
				None => derived_size(incident.get(node.id.as_str()).copied().unwrap_or(0)),
			};
			let entity_type = node
				.entity_type
				.as_deref()
				.map(EntityType::parse)
				.unwrap_or_default();
			nodes.push(Node {
				id: node.id.clone(),
				label: node.label.clone().unwrap_or_else(|| node.id.clone()),
				entity_type,
				color: entity_type.color(),
				size,
			});
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		let mut edge_index = HashMap::with_capacity(data.edges.len());
		let mut dangling = Vec::new();
		for (position, edge) in data.edges.iter().enumerate() {
			let id = edge
				.id
				.clone()
				.unwrap_or_else(|| format!("{}->{}#{}", edge.source_id, edge.target_id, position));
			if edge_index.contains_key(&id) {
				return Err(ValidationError::DuplicateEdge(id));
			}
			let weight = edge.weight.unwrap_or(DEFAULT_WEIGHT);
			if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
				return Err(ValidationError::InvalidWeight { id, weight });
			}

			let source = node_index.get(&edge.source_id).copied();
			let target = node_index.get(&edge.target_id).copied();
			for (resolved, node_id) in [(source, &edge.source_id), (target, &edge.target_id)] {
				if resolved.is_none() {
					dangling.push(DanglingEdge {
						edge_id: id.clone(),
						missing_node_id: node_id.clone(),
					});
				}
			}
			let (Some(source), Some(target)) = (source, target) else {
				continue;
			};

			edge_index.insert(id.clone(), edges.len());
			edges.push(Edge {
				id,
				source,
				target,
				relation_type: edge
					.relation_type
					.clone()
					.unwrap_or_else(|| DEFAULT_RELATION.to_string()),
				weight,
			});
		}
		if !dangling.is_empty() {
			return Err(ValidationError::DanglingEdges(dangling));
		}

		let mut adjacency = vec![Vec::new(); nodes.len()];
		for (idx, edge) in edges.iter().enumerate() {
			adjacency[edge.source].push(idx);
			if edge.target != edge.source {
				adjacency[edge.target].push(idx);
			}
		}
		let degrees = adjacency
			.iter()
			.enumerate()
			.map(|(node, incident)| {
				incident
					.iter()
					.map(|&e| other_end(&edges[e], node))
					.filter(|&other| other != node)
					.collect::<HashSet<_>>()
					.len()
			})
			.collect();

		Ok(Self {
			nodes,
			edges,
			node_index,
			edge_index,
			adjacency,
			degrees,
		})
	}

	/// All nodes, in payload order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges, in payload order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node at `idx`.
	pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
		self.nodes.get(idx)
	}

	/// Edge at `idx`.
	pub fn edge(&self, idx: EdgeIdx) -> Option<&Edge> {
		self.edges.get(idx)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// No nodes loaded.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// O(1) lookup by id.
	pub fn find_node(&self, id: &str) -> Option<&Node> {
		self.node_index(id).map(|idx| &self.nodes[idx])
	}

	/// Index of the node with id `id`.
	pub fn node_index(&self, id: &str) -> Option<NodeIdx> {
		self.node_index.get(id).copied()
	}

	/// Edge with id `id`.
	pub fn find_edge(&self, id: &str) -> Option<&Edge> {
		self.edge_index.get(id).map(|&idx| &self.edges[idx])
	}

	/// Edges incident to the node `id`, from the adjacency index.
	pub fn neighbors(&self, id: &str) -> Option<&[EdgeIdx]> {
		self.node_index(id).map(|idx| self.incident_edges(idx))
	}

	/// Edges touching node `idx`.
	pub fn incident_edges(&self, idx: NodeIdx) -> &[EdgeIdx] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Nodes joined to `idx` by an incident edge. May repeat for parallel edges.
	pub fn neighbor_nodes(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
		self.incident_edges(idx)
			.iter()
			.map(move |&e| other_end(&self.edges[e], idx))
	}

	/// Number of distinct neighbors, excluding the node itself.
	pub fn degree(&self, idx: NodeIdx) -> usize {
		self.degrees.get(idx).copied().unwrap_or(0)
	}

	/// Id of the edge's source node.
	pub fn source_id(&self, edge: &Edge) -> &str {
		&self.nodes[edge.source].id
	}

	/// Id of the edge's target node.
	pub fn target_id(&self, edge: &Edge) -> &str {
		&self.nodes[edge.target].id
	}
}

fn other_end(edge: &Edge, node: NodeIdx) -> NodeIdx {
	if edge.source == node {
		edge.target
	} else {
		edge.source
	}
}

/// Radius for a node whose payload carries no size.
fn derived_size(incident_edges: usize) -> f64 {
	(MIN_DERIVED_SIZE + 2.0 * incident_edges as f64).clamp(MIN_DERIVED_SIZE, MAX_DERIVED_SIZE)
}
