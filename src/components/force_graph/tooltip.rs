//! Hover tooltip model.
//!
//! There is exactly one tooltip per graph view. Hovering a node rewrites its
//! content and position; leaving hides it. The DOM overlay mirrors this state
//! and is never recreated.

use super::geometry::Point;
use super::model::{Graph, NodeIdx};

/// What the tooltip shows for a hovered node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	/// Hovered node.
	pub node: NodeIdx,
	/// Its payload id.
	pub node_id: String,
	/// Its label.
	pub label: String,
	/// Its entity type name.
	pub entity_type: &'static str,
	/// Distinct neighbor count at hover time.
	pub degree: usize,
}

impl TooltipContent {
	/// Content for `node`, or `None` if it is not in `graph`.
	pub fn for_node(graph: &Graph, node: NodeIdx) -> Option<Self> {
		let n = graph.node(node)?;
		Some(Self {
			node,
			node_id: n.id.clone(),
			label: n.label.clone(),
			entity_type: n.entity_type.as_str(),
			degree: graph.degree(node),
		})
	}

	/// Degree as shown, e.g. `3 connections`.
	pub fn degree_text(&self) -> String {
		match self.degree {
			1 => "1 connection".to_string(),
			n => format!("{n} connections"),
		}
	}
}

/// Single reusable overlay: content and visibility are toggled in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	content: Option<TooltipContent>,
	/// Screen-space position of the overlay's top-left corner.
	position: Point,
}

impl Tooltip {
	/// Show `content` at `anchor` (screen space) shifted by `offset`.
	pub fn show(&mut self, content: TooltipContent, anchor: Point, offset: Point) {
		self.position = Point::new(anchor.x + offset.x, anchor.y + offset.y);
		self.content = Some(content);
	}

	/// Follow the pointer without touching the content.
	pub fn move_to(&mut self, anchor: Point, offset: Point) {
		if self.content.is_some() {
			self.position = Point::new(anchor.x + offset.x, anchor.y + offset.y);
		}
	}

	/// Returns whether the tooltip was visible.
	pub fn hide(&mut self) -> bool {
		self.content.take().is_some()
	}

	/// The overlay is shown.
	pub fn is_visible(&self) -> bool {
		self.content.is_some()
	}

	/// What is shown, if visible.
	pub fn content(&self) -> Option<&TooltipContent> {
		self.content.as_ref()
	}

	/// Overlay position in canvas pixels.
	pub fn position(&self) -> Point {
		self.position
	}

	/// The node the tooltip currently describes.
	pub fn node(&self) -> Option<NodeIdx> {
		self.content.as_ref().map(|c| c.node)
	}
}
