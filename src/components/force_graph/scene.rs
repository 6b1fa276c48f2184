//! Retained display list built once per frame.
//!
//! A [`Scene`] is a snapshot of everything visible: resolved positions, final
//! colors and opacities, zoom-adjusted stroke widths. The canvas renderer and
//! the SVG exporter both consume it, so what is exported is exactly what is
//! on screen.

use super::geometry::{Bounds, Point};
use super::highlight::{Emphasis, Highlight};
use super::model::{Graph, NodeIdx};
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::viewport::ViewTransform;

/// Labels fainter than this are not emitted.
const MIN_LABEL_ALPHA: f64 = 0.01;

/// One relationship line.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	/// Edge id.
	pub id: String,
	/// Relationship name, exported as the line's title.
	pub relation_type: String,
	/// Source endpoint.
	pub from: Point,
	/// Target endpoint.
	pub to: Point,
	/// Stroke width, graph units.
	pub width: f64,
	/// Stroke color with highlight opacity applied.
	pub color: Color,
	/// Highlight reason.
	pub emphasis: Emphasis,
}

/// One entity circle.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Node id.
	pub id: String,
	/// Circle center.
	pub center: Point,
	/// Circle radius.
	pub radius: f64,
	/// Fill with highlight opacity applied.
	pub fill: Color,
	/// Outline with highlight opacity applied.
	pub stroke: Color,
	/// Outline width, graph units.
	pub stroke_width: f64,
	/// Highlight opacity.
	pub opacity: f64,
	/// Highlight reason.
	pub emphasis: Emphasis,
}

/// Outline around the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct RingShape {
	/// Center of the selected node.
	pub center: Point,
	/// Ring radius.
	pub radius: f64,
	/// Stroke width.
	pub width: f64,
	/// Stroke color.
	pub color: Color,
}

/// Text centered horizontally, top edge at `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelShape {
	/// Label text.
	pub text: String,
	/// Anchor point.
	pub position: Point,
	/// Font size, graph units.
	pub font_size: f64,
	/// Fill with fade applied.
	pub color: Color,
}

/// Where the scene is shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Surface size in pixels.
	pub bounds: Bounds,
}

/// Visual sizing and colors.
#[derive(Clone, Debug, Default)]
pub struct SceneStyle {
	/// Zoom-dependent sizing.
	pub scale: ScaleConfig,
	/// Colors.
	pub theme: Theme,
}

/// Everything visible in one frame, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	/// Where the scene is shown.
	pub frame: Frame,
	/// Background fill.
	pub background: Color,
	/// Label font family.
	pub font_family: &'static str,
	/// Relationship lines.
	pub edges: Vec<EdgeShape>,
	/// Dimmed nodes first, the selected node last.
	pub nodes: Vec<NodeShape>,
	/// Ring around the selected node.
	pub ring: Option<RingShape>,
	/// Node labels.
	pub labels: Vec<LabelShape>,
}

impl Scene {
	/// Build the display list. Nodes whose position is unknown or not finite
	/// are skipped along with their edges and labels.
	pub fn build<P>(graph: &Graph, position: P, highlight: &Highlight, frame: Frame, style: &SceneStyle) -> Self
	where
		P: Fn(NodeIdx) -> Option<Point>,
	{
		let theme = &style.theme;
		let scaled = ScaledValues::new(&style.scale, frame.transform.k);
		let positions: Vec<Option<Point>> = (0..graph.node_count())
			.map(|idx| position(idx).filter(|p| p.is_finite()))
			.collect();

		let edges = graph
			.edges()
			.iter()
			.enumerate()
			.filter_map(|(idx, edge)| {
				let from = positions[edge.source]?;
				let to = positions[edge.target]?;
				let visual = highlight.edge_visual(graph, idx);
				let base = theme.edge.color;
				Some(EdgeShape {
					id: edge.id.clone(),
					relation_type: edge.relation_type.clone(),
					from,
					to,
					width: scaled.edge_width * edge.weight.sqrt(),
					color: base.with_alpha(base.a * visual.opacity),
					emphasis: visual.emphasis,
				})
			})
			.collect();

		let mut nodes = Vec::with_capacity(graph.node_count());
		let mut labels = Vec::with_capacity(graph.node_count());
		let mut ring = None;
		for (idx, node) in graph.nodes().iter().enumerate() {
			let Some(center) = positions[idx] else {
				continue;
			};
			let visual = highlight.node_visual(idx);
			nodes.push(NodeShape {
				id: node.id.clone(),
				center,
				radius: node.size,
				fill: node.color.with_alpha(visual.opacity),
				stroke: theme.node.stroke.with_alpha(visual.opacity),
				stroke_width: scaled.node_stroke,
				opacity: visual.opacity,
				emphasis: visual.emphasis,
			});
			if visual.emphasis == Emphasis::Selected {
				ring = Some(RingShape {
					center,
					radius: node.size + scaled.ring_offset,
					width: scaled.ring_width,
					color: theme.node.selected_ring,
				});
			}

			let alpha = highlight.label_opacity(idx) * scaled.label_alpha;
			if alpha >= MIN_LABEL_ALPHA {
				labels.push(LabelShape {
					text: node.label.clone(),
					position: Point::new(center.x, center.y + node.size + scaled.label_gap),
					font_size: scaled.label_size,
					color: theme.label.color.with_alpha(alpha),
				});
			}
		}
		nodes.sort_by_key(|n| draw_rank(n.emphasis));

		Self {
			frame,
			background: theme.background.color,
			font_family: theme.label.font_family,
			edges,
			nodes,
			ring,
			labels,
		}
	}

	/// Nothing to draw: no graph, or no node has a position yet.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

fn draw_rank(emphasis: Emphasis) -> u8 {
	match emphasis {
		Emphasis::Dimmed => 0,
		Emphasis::Normal | Emphasis::Match => 1,
		Emphasis::Neighbor => 2,
		Emphasis::Selected => 3,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::highlight::HighlightConfig;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	const FRAME: Frame = Frame {
		transform: ViewTransform::IDENTITY,
		bounds: Bounds::new(400.0, 300.0),
	};

	fn graph() -> Graph {
		Graph::load(&GraphData {
			nodes: vec![
				GraphNode::new("a").with_label("Alpha").with_size(10.0).with_type("PERSON"),
				GraphNode::new("b").with_label("Beta").with_size(12.0),
				GraphNode::new("c").with_label("Gamma").with_size(9.0),
			],
			edges: vec![
				GraphEdge::new("ab", "a", "b").with_weight(1.0),
				GraphEdge::new("bc", "b", "c").with_weight(0.25),
			],
		})
		.unwrap()
	}

	fn grid(idx: NodeIdx) -> Option<Point> {
		Some(Point::new(50.0 * idx as f64, 40.0))
	}

	#[test]
	fn builds_edges_nodes_and_labels_below_nodes() {
		let graph = graph();
		let scene = Scene::build(&graph, grid, &Highlight::default(), FRAME, &SceneStyle::default());
		assert_eq!(scene.edges.len(), 2);
		assert_eq!(scene.nodes.len(), 3);
		assert_eq!(scene.labels.len(), 3);
		assert!(scene.ring.is_none());

		let a = &scene.nodes[0];
		assert_eq!(a.radius, 10.0);
		assert_eq!(a.fill, Color::rgb(0x3b, 0x82, 0xf6));
		assert_eq!(a.stroke, Color::rgb(255, 255, 255));

		let label = &scene.labels[0];
		assert_eq!(label.text, "Alpha");
		assert!(label.position.y > a.center.y + a.radius);
		assert_eq!(label.position.x, a.center.x);
	}

	#[test]
	fn edge_width_grows_with_square_root_of_weight() {
		let graph = graph();
		let scene = Scene::build(&graph, grid, &Highlight::default(), FRAME, &SceneStyle::default());
		let (heavy, light) = (&scene.edges[0], &scene.edges[1]);
		assert!((heavy.width / light.width - 2.0).abs() < 1e-9);
	}

	#[test]
	fn unresolved_positions_are_skipped() {
		let graph = graph();
		let position = |idx: NodeIdx| match idx {
			1 => None,
			2 => Some(Point::new(f64::NAN, 0.0)),
			_ => grid(idx),
		};
		let scene = Scene::build(&graph, position, &Highlight::default(), FRAME, &SceneStyle::default());
		assert_eq!(scene.nodes.len(), 1);
		assert_eq!(scene.labels.len(), 1);
		assert!(scene.edges.is_empty());
		assert!(!scene.is_empty());

		let nothing = Scene::build(&graph, |_| None, &Highlight::default(), FRAME, &SceneStyle::default());
		assert!(nothing.is_empty());
	}

	#[test]
	fn selection_dims_and_reorders() {
		let graph = graph();
		let mut highlight = Highlight::default();
		highlight.select(&graph, 0);
		let scene = Scene::build(&graph, grid, &highlight, FRAME, &SceneStyle::default());

		let dim = HighlightConfig::default();
		assert_eq!(scene.nodes[0].id, "c");
		assert_eq!(scene.nodes[0].opacity, dim.dim_node_opacity);
		assert_eq!(scene.nodes.last().map(|n| n.id.as_str()), Some("a"));

		let ring = scene.ring.as_ref().unwrap();
		assert_eq!(ring.center, Point::new(0.0, 40.0));
		assert!(ring.radius > 10.0);

		let edge_alpha = SceneStyle::default().theme.edge.color.a;
		assert_eq!(scene.edges[0].color.a, edge_alpha);
		assert!((scene.edges[1].color.a - edge_alpha * dim.dim_edge_opacity).abs() < 1e-12);
	}

	#[test]
	fn labels_fade_out_when_zoomed_far_out() {
		let graph = graph();
		let frame = Frame {
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 0.1,
			},
			..FRAME
		};
		let scene = Scene::build(&graph, grid, &Highlight::default(), frame, &SceneStyle::default());
		assert!(scene.labels.is_empty());
		assert_eq!(scene.nodes.len(), 3);
	}
}
