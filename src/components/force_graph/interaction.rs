//! Pointer protocol: dragging, panning, wheel zoom, click selection and hover.
//!
//! All inputs arrive in canvas pixels. Nodes are tracked by id across events,
//! so an event that lands after a reload simply finds nothing and is dropped.

use log::debug;
use serde::Deserialize;

use super::geometry::Point;
use super::model::{Graph, NodeIdx};
use super::simulation::Simulation;
use super::tooltip::{Tooltip, TooltipContent};
use super::viewport::Viewport;

/// Pointer behavior settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
	/// Leave dragged nodes pinned where they were dropped.
	pub keep_fixed: bool,
	/// Pointer travel (px) below which a press counts as a click.
	pub click_tolerance: f64,
	/// Extra hit radius around nodes (px).
	pub hit_slop: f64,
	/// Horizontal tooltip distance from the pointer (px).
	pub tooltip_offset_x: f64,
	/// Vertical tooltip distance from the pointer (px).
	pub tooltip_offset_y: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			keep_fixed: false,
			click_tolerance: 3.0,
			hit_slop: 4.0,
			tooltip_offset_x: 12.0,
			tooltip_offset_y: 12.0,
		}
	}
}

impl InteractionConfig {
	fn tooltip_offset(&self) -> Point {
		Point::new(self.tooltip_offset_x, self.tooltip_offset_y)
	}
}

/// Everything a pointer event may read or write.
pub struct InteractionTargets<'a> {
	/// Loaded graph.
	pub graph: &'a Graph,
	/// Simulation owning node positions.
	pub simulation: &'a mut Simulation,
	/// Pan and zoom.
	pub viewport: &'a mut Viewport,
	/// Hover tooltip.
	pub tooltip: &'a mut Tooltip,
}

/// Selection change requested by a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
	/// Select the node.
	Select(NodeIdx),
	/// Clear the selection.
	Clear,
}

/// Result of handling one pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
	/// The view or a node position changed.
	pub redraw: bool,
	/// Selection change requested by a click.
	pub selection: Option<SelectionChange>,
}

impl Response {
	const NONE: Response = Response {
		redraw: false,
		selection: None,
	};
	const REDRAW: Response = Response {
		redraw: true,
		selection: None,
	};

	fn select(change: SelectionChange) -> Self {
		Self {
			redraw: true,
			selection: Some(change),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	/// Button down, not yet past the click tolerance.
	Pressed {
		node_id: Option<String>,
		origin: Point,
		/// Node position minus pointer position, graph space.
		grab_offset: Point,
	},
	DraggingNode {
		node_id: String,
		grab_offset: Point,
	},
	Panning {
		last: Point,
	},
}

/// Translates raw pointer events into simulation, viewport and selection
/// changes.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	config: InteractionConfig,
	gesture: Gesture,
}

impl InteractionController {
	/// Controller in the idle state.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			gesture: Gesture::Idle,
		}
	}

	/// Active settings.
	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	/// A node is being dragged.
	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::DraggingNode { .. })
	}

	/// The background is being dragged.
	pub fn is_panning(&self) -> bool {
		matches!(self.gesture, Gesture::Panning { .. })
	}

	/// Id of the node being dragged, if any.
	pub fn dragged_node(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::DraggingNode { node_id, .. } => Some(node_id),
			_ => None,
		}
	}

	/// Topmost node under `screen`, within the hit slop.
	pub fn node_at(&self, t: &InteractionTargets<'_>, screen: Point) -> Option<NodeIdx> {
		let p = t.viewport.screen_to_graph(screen);
		let slop = self.config.hit_slop / t.viewport.scale();
		// Later nodes are drawn on top, so they win ties.
		t.graph
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.filter_map(|(idx, node)| {
				let d = t.simulation.position(idx)?.distance(p);
				(d <= node.size + slop).then_some((idx, d - node.size))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	/// Start a press. A drag still in progress (its release was never
	/// delivered) is finished first.
	pub fn pointer_down(&mut self, t: &mut InteractionTargets<'_>, screen: Point) -> Response {
		if let Gesture::DraggingNode { node_id, .. } = std::mem::take(&mut self.gesture) {
			debug!("interaction: finishing drag of `{node_id}` on new press");
			self.release(t, &node_id);
		}
		let hit = self.node_at(t, screen);
		let pointer = t.viewport.screen_to_graph(screen);
		let (node_id, grab_offset) = match hit.and_then(|idx| Some((idx, t.simulation.position(idx)?))) {
			Some((idx, pos)) => (
				Some(t.graph.nodes()[idx].id.clone()),
				Point::new(pos.x - pointer.x, pos.y - pointer.y),
			),
			None => (None, Point::default()),
		};
		self.gesture = Gesture::Pressed {
			node_id,
			origin: screen,
			grab_offset,
		};
		Response::NONE
	}

	/// Pointer moved: hover, drag or pan depending on the gesture.
	pub fn pointer_move(&mut self, t: &mut InteractionTargets<'_>, screen: Point) -> Response {
		if !screen.is_finite() {
			return Response::NONE;
		}
		match std::mem::take(&mut self.gesture) {
			Gesture::Idle => self.hover(t, screen),
			Gesture::Pressed {
				node_id,
				origin,
				grab_offset,
			} => {
				if origin.distance(screen) <= self.config.click_tolerance {
					self.gesture = Gesture::Pressed {
						node_id,
						origin,
						grab_offset,
					};
					return Response::NONE;
				}
				match node_id {
					Some(node_id) => self.start_drag(t, node_id, grab_offset, screen),
					None => {
						t.viewport.pan_by(screen.x - origin.x, screen.y - origin.y);
						self.gesture = Gesture::Panning { last: screen };
						Response::REDRAW
					}
				}
			}
			Gesture::DraggingNode {
				node_id,
				grab_offset,
			} => self.drag_to(t, node_id, grab_offset, screen),
			Gesture::Panning { last } => {
				t.viewport.pan_by(screen.x - last.x, screen.y - last.y);
				self.gesture = Gesture::Panning { last: screen };
				Response::REDRAW
			}
		}
	}

	/// Button released: click selection or end of a drag.
	pub fn pointer_up(&mut self, t: &mut InteractionTargets<'_>, _screen: Point) -> Response {
		match std::mem::take(&mut self.gesture) {
			Gesture::Pressed { node_id: Some(id), .. } => match t.graph.node_index(&id) {
				Some(idx) => Response::select(SelectionChange::Select(idx)),
				None => {
					debug!("interaction: click on `{id}` ignored, node no longer loaded");
					Response::NONE
				}
			},
			Gesture::Pressed { node_id: None, .. } => Response::select(SelectionChange::Clear),
			Gesture::DraggingNode { node_id, .. } => {
				self.release(t, &node_id);
				Response::REDRAW
			}
			Gesture::Panning { .. } | Gesture::Idle => Response::NONE,
		}
	}

	/// Pointer left the canvas: finish any drag without clicking and hide the
	/// tooltip.
	pub fn pointer_leave(&mut self, t: &mut InteractionTargets<'_>) -> Response {
		let mut response = Response::NONE;
		if let Gesture::DraggingNode { node_id, .. } = std::mem::take(&mut self.gesture) {
			self.release(t, &node_id);
			response = Response::REDRAW;
		}
		t.tooltip.hide();
		response
	}

	/// Zoom about the pointer. Positive `delta_y` zooms out.
	pub fn wheel(&mut self, t: &mut InteractionTargets<'_>, delta_y: f64, screen: Point) -> Response {
		if t.viewport.zoom_wheel(delta_y, screen) {
			t.tooltip.move_to(screen, self.config.tooltip_offset());
			Response::REDRAW
		} else {
			Response::NONE
		}
	}

	/// Forget the current gesture without touching any target. Used when the
	/// graph is replaced under an active gesture.
	pub fn cancel(&mut self) {
		self.gesture = Gesture::Idle;
	}

	fn hover(&mut self, t: &mut InteractionTargets<'_>, screen: Point) -> Response {
		let offset = self.config.tooltip_offset();
		match self.node_at(t, screen) {
			Some(idx) if t.tooltip.node() == Some(idx) => t.tooltip.move_to(screen, offset),
			Some(idx) => {
				if let Some(content) = TooltipContent::for_node(t.graph, idx) {
					t.tooltip.show(content, screen, offset);
				}
			}
			None => {
				t.tooltip.hide();
			}
		}
		Response::NONE
	}

	fn start_drag(
		&mut self,
		t: &mut InteractionTargets<'_>,
		node_id: String,
		grab_offset: Point,
		screen: Point,
	) -> Response {
		let Some(idx) = t.graph.node_index(&node_id) else {
			debug!("interaction: drag on `{node_id}` cancelled, node no longer loaded");
			return Response::NONE;
		};
		t.simulation.pin(idx);
		t.tooltip.hide();
		self.drag_to(t, node_id, grab_offset, screen)
	}

	fn drag_to(
		&mut self,
		t: &mut InteractionTargets<'_>,
		node_id: String,
		grab_offset: Point,
		screen: Point,
	) -> Response {
		let Some(idx) = t.graph.node_index(&node_id) else {
			debug!("interaction: drag on `{node_id}` cancelled, node no longer loaded");
			return Response::NONE;
		};
		let p = t.viewport.screen_to_graph(screen);
		let moved = t
			.simulation
			.move_pinned(idx, Point::new(p.x + grab_offset.x, p.y + grab_offset.y));
		self.gesture = Gesture::DraggingNode {
			node_id,
			grab_offset,
		};
		Response {
			redraw: moved,
			selection: None,
		}
	}

	fn release(&self, t: &mut InteractionTargets<'_>, node_id: &str) {
		match t.graph.node_index(node_id) {
			Some(_) if self.config.keep_fixed => {
				debug!("interaction: `{node_id}` stays pinned");
				t.simulation.cool_down();
			}
			Some(idx) => {
				t.simulation.unpin(idx);
			}
			None => debug!("interaction: release of `{node_id}` ignored, node no longer loaded"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::geometry::Bounds;
	use crate::components::force_graph::simulation::SimulationConfig;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	struct Fixture {
		graph: Graph,
		simulation: Simulation,
		viewport: Viewport,
		tooltip: Tooltip,
	}

	impl Fixture {
		fn new() -> Self {
			let data = GraphData {
				nodes: vec![
					GraphNode::new("a").with_label("Alpha").with_size(10.0),
					GraphNode::new("b").with_label("Beta").with_size(10.0),
				],
				edges: vec![GraphEdge::new("ab", "a", "b")],
			};
			let graph = Graph::load(&data).unwrap();
			let mut simulation = Simulation::new(&graph, SimulationConfig::default(), Bounds::new(800.0, 600.0));
			simulation.start();
			Self {
				graph,
				simulation,
				viewport: Viewport::default(),
				tooltip: Tooltip::default(),
			}
		}

		fn targets(&mut self) -> InteractionTargets<'_> {
			InteractionTargets {
				graph: &self.graph,
				simulation: &mut self.simulation,
				viewport: &mut self.viewport,
				tooltip: &mut self.tooltip,
			}
		}

		fn screen_of(&self, idx: NodeIdx) -> Point {
			self.viewport
				.transform()
				.graph_to_screen(self.simulation.position(idx).unwrap())
		}

		/// A background point far away from every node.
		fn empty_spot(&self) -> Point {
			Point::new(-5000.0, -5000.0)
		}
	}

	fn shifted(p: Point, dx: f64, dy: f64) -> Point {
		Point::new(p.x + dx, p.y + dy)
	}

	#[test]
	fn click_on_node_selects_it() {
		let mut f = Fixture::new();
		let at = f.screen_of(1);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), at);
		// Jitter inside the tolerance is still a click.
		ctl.pointer_move(&mut f.targets(), shifted(at, 1.0, 1.0));
		let r = ctl.pointer_up(&mut f.targets(), at);
		assert_eq!(r.selection, Some(SelectionChange::Select(1)));
		assert!(!f.simulation.is_pinned(1));
	}

	#[test]
	fn click_on_background_clears_selection() {
		let mut f = Fixture::new();
		let spot = f.empty_spot();
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), spot);
		let r = ctl.pointer_up(&mut f.targets(), spot);
		assert_eq!(r.selection, Some(SelectionChange::Clear));
	}

	#[test]
	fn drag_follows_pointer_at_any_zoom_and_unpins_on_release() {
		let mut f = Fixture::new();
		f.viewport.zoom_by(2.0, Point::new(100.0, 100.0));
		let start = f.screen_of(0);
		let before = f.simulation.position(0).unwrap();

		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), start);
		let r = ctl.pointer_move(&mut f.targets(), shifted(start, 40.0, -20.0));
		assert!(r.redraw);
		assert!(ctl.is_dragging());
		assert_eq!(ctl.dragged_node(), Some("a"));
		assert!(f.simulation.is_pinned(0));
		assert_eq!(f.simulation.alpha_target(), SimulationConfig::default().drag_alpha_target);

		let after = f.simulation.position(0).unwrap();
		// 40 px at k = 2 is 20 graph units.
		assert!((after.x - before.x - 20.0).abs() < 1e-9);
		assert!((after.y - before.y + 10.0).abs() < 1e-9);

		let r = ctl.pointer_up(&mut f.targets(), shifted(start, 40.0, -20.0));
		assert!(r.selection.is_none());
		assert!(!f.simulation.is_pinned(0));
		assert_eq!(f.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn keep_fixed_leaves_node_pinned() {
		let mut f = Fixture::new();
		let start = f.screen_of(0);
		let mut ctl = InteractionController::new(InteractionConfig {
			keep_fixed: true,
			..InteractionConfig::default()
		});
		ctl.pointer_down(&mut f.targets(), start);
		ctl.pointer_move(&mut f.targets(), shifted(start, 30.0, 0.0));
		ctl.pointer_up(&mut f.targets(), shifted(start, 30.0, 0.0));
		assert!(f.simulation.is_pinned(0));
		assert_eq!(f.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn new_press_finishes_a_drag_whose_release_was_lost() {
		let mut f = Fixture::new();
		let start = f.screen_of(0);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), start);
		ctl.pointer_move(&mut f.targets(), shifted(start, 30.0, 0.0));
		assert!(f.simulation.is_pinned(0));

		// No pointer_up for the drag; the next press lands on the background.
		let spot = f.empty_spot();
		ctl.pointer_down(&mut f.targets(), spot);
		assert!(!ctl.is_dragging());
		assert!(!f.simulation.is_pinned(0));
		assert_eq!(f.simulation.alpha_target(), 0.0);

		let r = ctl.pointer_up(&mut f.targets(), spot);
		assert_eq!(r.selection, Some(SelectionChange::Clear));
		assert!(!f.simulation.is_pinned(0));
	}

	#[test]
	fn background_drag_pans_viewport() {
		let mut f = Fixture::new();
		let spot = f.empty_spot();
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), spot);
		ctl.pointer_move(&mut f.targets(), shifted(spot, 10.0, 5.0));
		ctl.pointer_move(&mut f.targets(), shifted(spot, 25.0, -5.0));
		assert!(ctl.is_panning());
		assert_eq!(f.viewport.transform().x, 25.0);
		assert_eq!(f.viewport.transform().y, -5.0);
		let r = ctl.pointer_up(&mut f.targets(), spot);
		assert!(r.selection.is_none());
	}

	#[test]
	fn events_for_nodes_missing_after_reload_are_ignored() {
		let mut f = Fixture::new();
		let start = f.screen_of(0);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut f.targets(), start);

		let reloaded = Graph::load(&GraphData {
			nodes: vec![GraphNode::new("x"), GraphNode::new("y")],
			edges: vec![],
		})
		.unwrap();
		f.graph = reloaded;

		let r = ctl.pointer_move(&mut f.targets(), shifted(start, 50.0, 50.0));
		assert_eq!(r, Response::NONE);
		assert!(!ctl.is_dragging());
		assert!(!f.simulation.is_pinned(0));

		ctl.pointer_down(&mut Fixture::new().targets(), start);
		let r = ctl.pointer_up(&mut f.targets(), start);
		assert!(r.selection.is_none());
	}

	#[test]
	fn hover_shows_one_tooltip_and_leave_hides_it() {
		let mut f = Fixture::new();
		let mut ctl = InteractionController::default();
		let over_a = f.screen_of(0);
		ctl.pointer_move(&mut f.targets(), over_a);
		let content = f.tooltip.content().unwrap();
		assert_eq!(content.label, "Alpha");
		assert_eq!(content.degree, 1);
		assert_eq!(f.tooltip.position(), shifted(over_a, 12.0, 12.0));

		let spot = f.empty_spot();
		ctl.pointer_move(&mut f.targets(), spot);
		assert!(!f.tooltip.is_visible());

		ctl.pointer_move(&mut f.targets(), over_a);
		assert!(f.tooltip.is_visible());
		ctl.pointer_leave(&mut f.targets());
		assert!(!f.tooltip.is_visible());
	}

	#[test]
	fn wheel_zooms_about_pointer() {
		let mut f = Fixture::new();
		let mut ctl = InteractionController::default();
		let anchor = Point::new(200.0, 150.0);
		let under = f.viewport.screen_to_graph(anchor);
		assert!(ctl.wheel(&mut f.targets(), -100.0, anchor).redraw);
		assert!(f.viewport.scale() > 1.0);
		assert!(f.viewport.transform().graph_to_screen(under).distance(anchor) < 1e-9);
		assert!(!ctl.wheel(&mut f.targets(), 0.0, anchor).redraw);
	}
}
