//! Graph view state: the loaded graph, its simulation, and everything the
//! user can change about how it is shown.
//!
//! [`ForceGraphState`] owns exactly one graph and at most one live
//! simulation. It is driven by the component (pointer events, toolbar
//! controls, animation frames) and reports back through an event outbox
//! drained with [`take_events`](ForceGraphState::take_events).

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

use super::config::GraphConfig;
use super::error::{ExportError, GraphResult, ValidationError};
use super::events::{GraphEvent, SelectedNode};
use super::export::{SUGGESTED_FILENAME, export_svg};
use super::geometry::{Bounds, Point};
use super::highlight::Highlight;
use super::interaction::{InteractionController, InteractionTargets, Response, SelectionChange};
use super::model::{Graph, NodeIdx};
use super::sample::sample_graph;
use super::scene::{Frame, Scene, SceneStyle};
use super::simulation::{Simulation, SimulationStatus};
use super::stats::GraphStats;
use super::tooltip::Tooltip;
use super::types::{GraphData, GraphSource};
use super::viewport::Viewport;

/// Core graph state combining the simulation with view, selection and
/// interaction tracking.
///
/// Created once when the component mounts, then mutated by input handlers
/// and by the animation loop via [`frame`](Self::frame).
pub struct ForceGraphState {
	graph: Option<Graph>,
	simulation: Option<Simulation>,
	viewport: Viewport,
	highlight: Highlight,
	interaction: InteractionController,
	tooltip: Tooltip,
	config: GraphConfig,
	style: SceneStyle,
	bounds: Bounds,
	/// Bumped by every Reset so each one yields a fresh layout.
	resets: u64,
	/// Set by the simulation's tick listener.
	ticked: Rc<Cell<bool>>,
	/// Set by input that changes the picture without a tick.
	dirty: bool,
	events: Vec<GraphEvent>,
}

impl ForceGraphState {
	/// Empty state; nothing is shown until a graph is loaded.
	pub fn new(config: GraphConfig, bounds: Bounds) -> Self {
		Self {
			graph: None,
			simulation: None,
			viewport: Viewport::new(config.viewport.clone()),
			highlight: Highlight::new(config.highlight.clone()),
			interaction: InteractionController::new(config.interaction.clone()),
			tooltip: Tooltip::default(),
			style: SceneStyle::default(),
			bounds,
			resets: 0,
			ticked: Rc::new(Cell::new(false)),
			dirty: true,
			events: Vec::new(),
			config,
		}
	}

	/// Validate and install a new graph, replacing the current one.
	///
	/// On error nothing changes: the previous graph keeps running.
	pub fn load(&mut self, data: &GraphData) -> Result<(), ValidationError> {
		let graph = Graph::load(data)?;

		if let Some(old) = self.simulation.as_mut() {
			old.stop();
		}
		let mut simulation = Simulation::new(&graph, self.config.simulation.clone(), self.bounds);
		let ticked = Rc::clone(&self.ticked);
		simulation.on_tick(move |_| ticked.set(true));
		simulation.start();

		if self.highlight.selected().is_some() {
			self.events.push(GraphEvent::SelectionCleared);
		}
		let query = self.highlight.search_query().map(str::to_string);
		self.highlight.reset();
		if let Some(query) = query {
			self.highlight.set_search(&graph, &query);
		}
		self.interaction.cancel();
		self.tooltip.hide();
		self.resets = 0;

		let stats = GraphStats::compute(&graph);
		info!(
			"graph: loaded {} nodes, {} edges",
			stats.total_nodes, stats.total_edges
		);
		self.graph = Some(graph);
		self.simulation = Some(simulation);
		self.dirty = true;
		self.events.push(GraphEvent::Loaded(stats));
		Ok(())
	}

	/// Parse a JSON payload and [`load`](Self::load) it.
	pub fn load_json(&mut self, json: &str) -> GraphResult<()> {
		let data = GraphData::from_json(json)?;
		self.load(&data)?;
		Ok(())
	}

	/// Load `source`, falling back to the built-in sample when it is missing,
	/// malformed or invalid and no graph is shown yet. Failures are reported
	/// as [`GraphEvent::Error`] with the underlying reason.
	pub fn load_or_fallback(&mut self, source: Option<&GraphSource>) {
		let outcome = match source {
			Some(GraphSource::Data(data)) => self.load(data).map_err(|e| e.to_string()),
			Some(GraphSource::Json(json)) => self.load_json(json).map_err(|e| e.to_string()),
			None => Err("no graph data available".to_string()),
		};
		let Err(reason) = outcome else {
			return;
		};
		if self.graph.is_some() {
			warn!("graph: keeping current graph: {reason}");
			self.events.push(GraphEvent::Error(reason));
			return;
		}
		warn!("graph: falling back to the sample graph: {reason}");
		self.events.push(GraphEvent::Error(format!(
			"{reason}; showing the built-in sample graph"
		)));
		if let Err(e) = self.load(&sample_graph()) {
			warn!("graph: sample graph rejected: {e}");
		}
	}

	/// Reset control: clear the selection, re-randomize positions and restart
	/// the simulation.
	pub fn reset(&mut self) {
		self.clear_selection();
		self.interaction.cancel();
		self.tooltip.hide();
		self.resets += 1;
		let seed = self.config.simulation.seed.wrapping_add(self.resets);
		if let Some(sim) = self.simulation.as_mut() {
			sim.randomize(seed);
			sim.start();
		}
		self.dirty = true;
	}

	/// Zoom-in control, anchored at the viewport center.
	pub fn zoom_in(&mut self) {
		self.dirty |= self.viewport.zoom_in(self.bounds.center());
	}

	/// Zoom-out control, anchored at the viewport center.
	pub fn zoom_out(&mut self) {
		self.dirty |= self.viewport.zoom_out(self.bounds.center());
	}

	/// Reset-view control: back to the identity transform.
	pub fn reset_view(&mut self) {
		self.viewport.reset();
		self.dirty = true;
	}

	/// Play/pause. Returns the new status, or `None` with nothing loaded.
	pub fn toggle_simulation(&mut self) -> Option<SimulationStatus> {
		let status = self.simulation.as_mut()?.toggle();
		info!("graph: simulation {status:?}");
		Some(status)
	}

	/// The simulation is running.
	pub fn is_running(&self) -> bool {
		self.simulation.as_ref().is_some_and(Simulation::is_running)
	}

	/// Serialize what is currently shown and hand it to the host.
	pub fn export(&mut self) -> Result<(), ExportError> {
		match export_svg(&self.scene()) {
			Ok(bytes) => {
				self.events.push(GraphEvent::ExportRequested {
					bytes,
					filename: SUGGESTED_FILENAME.to_string(),
				});
				Ok(())
			}
			Err(e) => {
				warn!("graph: {e}");
				self.events.push(GraphEvent::Error(e.to_string()));
				Err(e)
			}
		}
	}

	/// Restrict highlighting to labels containing `query`; blank clears it.
	pub fn set_search(&mut self, query: &str) {
		if let Some(graph) = self.graph.as_ref() {
			self.highlight.set_search(graph, query);
		} else {
			self.highlight.reset();
		}
		self.dirty = true;
	}

	/// Number of search matches, `None` without an active search.
	pub fn search_matches(&self) -> Option<usize> {
		self.highlight.match_count()
	}

	/// Select node `idx` and report it. Re-selecting is a no-op.
	pub fn select(&mut self, idx: NodeIdx) {
		let Some(graph) = self.graph.as_ref() else {
			return;
		};
		if !self.highlight.select(graph, idx) {
			return;
		}
		if let Some(node) = SelectedNode::from_graph(graph, idx) {
			info!("graph: selected `{}`", node.id);
			self.events.push(GraphEvent::NodeSelected(node));
		}
		self.dirty = true;
	}

	/// Select by node id; unknown ids are ignored.
	pub fn select_id(&mut self, id: &str) {
		if let Some(idx) = self.graph.as_ref().and_then(|g| g.node_index(id)) {
			self.select(idx);
		}
	}

	/// Clear the selection, reporting it if there was one.
	pub fn clear_selection(&mut self) {
		if self.highlight.clear() {
			self.events.push(GraphEvent::SelectionCleared);
			self.dirty = true;
		}
	}

	/// The selected node, if any.
	pub fn selected_node(&self) -> Option<SelectedNode> {
		let graph = self.graph.as_ref()?;
		SelectedNode::from_graph(graph, self.highlight.selected()?)
	}

	/// Pointer pressed at `screen` (canvas pixels).
	pub fn pointer_down(&mut self, screen: Point) {
		self.with_targets(|ctl, t| ctl.pointer_down(t, screen));
	}

	/// Pointer moved to `screen`.
	pub fn pointer_move(&mut self, screen: Point) {
		self.with_targets(|ctl, t| ctl.pointer_move(t, screen));
	}

	/// Pointer released at `screen`.
	pub fn pointer_up(&mut self, screen: Point) {
		self.with_targets(|ctl, t| ctl.pointer_up(t, screen));
	}

	/// Pointer left the canvas.
	pub fn pointer_leave(&mut self) {
		self.with_targets(|ctl, t| ctl.pointer_leave(t));
		self.tooltip.hide();
	}

	/// Wheel zoom about `screen`.
	pub fn wheel(&mut self, delta_y: f64, screen: Point) {
		self.with_targets(|ctl, t| ctl.wheel(t, delta_y, screen));
	}

	fn with_targets<F>(&mut self, handle: F)
	where
		F: FnOnce(&mut InteractionController, &mut InteractionTargets<'_>) -> Response,
	{
		let (Some(graph), Some(simulation)) = (self.graph.as_ref(), self.simulation.as_mut()) else {
			return;
		};
		let mut targets = InteractionTargets {
			graph,
			simulation,
			viewport: &mut self.viewport,
			tooltip: &mut self.tooltip,
		};
		let response = handle(&mut self.interaction, &mut targets);
		self.dirty |= response.redraw;
		match response.selection {
			Some(SelectionChange::Select(idx)) => self.select(idx),
			Some(SelectionChange::Clear) => self.clear_selection(),
			None => {}
		}
	}

	/// Advance one animation frame. Returns whether the picture changed and
	/// needs repainting.
	pub fn frame(&mut self) -> bool {
		if let Some(sim) = self.simulation.as_mut() {
			sim.step_frame();
		}
		let changed = self.ticked.replace(false) || self.dirty;
		self.dirty = false;
		changed
	}

	/// Display list for the current positions, view and highlight.
	pub fn scene(&self) -> Scene {
		let frame = Frame {
			transform: self.viewport.transform(),
			bounds: self.bounds,
		};
		match (self.graph.as_ref(), self.simulation.as_ref()) {
			(Some(graph), Some(sim)) => {
				Scene::build(graph, |idx| sim.position(idx), &self.highlight, frame, &self.style)
			}
			_ => Scene::build(&Graph::default(), |_| None, &self.highlight, frame, &self.style),
		}
	}

	/// The drawing surface changed size.
	pub fn resize(&mut self, bounds: Bounds) {
		if bounds == self.bounds {
			return;
		}
		self.bounds = bounds;
		if let Some(sim) = self.simulation.as_mut() {
			sim.set_bounds(bounds);
		}
		self.dirty = true;
	}

	/// Current surface size.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Release the simulation. The state stays usable for a later load.
	pub fn teardown(&mut self) {
		if let Some(mut sim) = self.simulation.take() {
			sim.stop();
		}
		self.graph = None;
		self.interaction.cancel();
		self.tooltip.hide();
		self.highlight.reset();
		info!("graph: torn down");
	}

	/// Drain queued events for the host.
	pub fn take_events(&mut self) -> Vec<GraphEvent> {
		std::mem::take(&mut self.events)
	}

	/// Loaded graph.
	pub fn graph(&self) -> Option<&Graph> {
		self.graph.as_ref()
	}

	/// Live simulation.
	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	/// Pan and zoom.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Selection and search state.
	pub fn highlight(&self) -> &Highlight {
		&self.highlight
	}

	/// Hover tooltip.
	pub fn tooltip(&self) -> &Tooltip {
		&self.tooltip
	}

	/// Visual style.
	pub fn style(&self) -> &SceneStyle {
		&self.style
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::highlight::Emphasis;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};

	const BOUNDS: Bounds = Bounds::new(800.0, 600.0);

	fn abcd() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new("a").with_label("Ada"),
				GraphNode::new("b").with_label("Babbage"),
				GraphNode::new("c").with_label("Countess"),
				GraphNode::new("d").with_label("Difference Engine"),
			],
			edges: vec![
				GraphEdge::new("e1", "a", "b").with_weight(0.9),
				GraphEdge::new("e2", "b", "c").with_weight(0.5),
			],
		}
	}

	fn loaded() -> ForceGraphState {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		state.load(&abcd()).unwrap();
		state.take_events();
		state
	}

	fn screen_of(state: &ForceGraphState, idx: NodeIdx) -> Point {
		let p = state.simulation().unwrap().position(idx).unwrap();
		state.viewport().transform().graph_to_screen(p)
	}

	#[test]
	fn load_reports_stats_and_starts_simulation() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		state.load(&abcd()).unwrap();
		assert!(state.is_running());
		match state.take_events().as_slice() {
			[GraphEvent::Loaded(stats)] => {
				assert_eq!(stats.total_nodes, 4);
				assert_eq!(stats.total_edges, 2);
			}
			other => panic!("unexpected events {other:?}"),
		}
		assert!(state.take_events().is_empty());
	}

	#[test]
	fn invalid_payload_keeps_previous_graph() {
		let mut state = loaded();
		for _ in 0..5 {
			state.frame();
		}
		let ticks = state.simulation().unwrap().tick_count();

		let mut bad = abcd();
		bad.edges.push(GraphEdge::new("e3", "a", "z"));
		let err = state.load(&bad).unwrap_err();
		assert!(err.to_string().contains("missing node `z`"));

		assert_eq!(state.graph().unwrap().node_count(), 4);
		assert!(state.graph().unwrap().find_edge("e3").is_none());
		assert_eq!(state.simulation().unwrap().tick_count(), ticks);
		assert!(state.is_running());
		assert!(state.take_events().is_empty());
	}

	#[test]
	fn reload_replaces_simulation_and_reapplies_search() {
		let mut state = loaded();
		state.set_search("bab");
		state.select_id("a");
		for _ in 0..10 {
			state.frame();
		}

		let mut next = abcd();
		next.nodes.push(GraphNode::new("e").with_label("Babylon"));
		state.load(&next).unwrap();

		let sim = state.simulation().unwrap();
		assert_eq!(sim.tick_count(), 0);
		assert_eq!(sim.len(), 5);
		assert!(state.highlight().selected().is_none());
		assert_eq!(state.search_matches(), Some(2));
	}

	#[test]
	fn missing_payload_falls_back_to_sample() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		state.load_or_fallback(None);
		assert_eq!(state.graph().unwrap().node_count(), 12);
		let events = state.take_events();
		assert!(matches!(&events[0], GraphEvent::Error(msg) if msg.contains("sample")));
		assert!(matches!(events[1], GraphEvent::Loaded(_)));
	}

	#[test]
	fn invalid_payload_with_live_graph_is_reported_without_fallback() {
		let mut state = loaded();
		let mut dup = abcd();
		dup.nodes.push(GraphNode::new("a"));
		state.load_or_fallback(Some(&GraphSource::Data(dup)));
		assert_eq!(state.graph().unwrap().node_count(), 4);
		let events = state.take_events();
		assert_eq!(events.len(), 1);
		assert!(matches!(&events[0], GraphEvent::Error(msg) if msg.contains("`a`")));
	}

	#[test]
	fn malformed_json_falls_back_with_parse_reason() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		state.load_or_fallback(Some(&GraphSource::Json("{ nodes: ".to_string())));
		assert_eq!(state.graph().unwrap().node_count(), 12);
		let events = state.take_events();
		match &events[0] {
			GraphEvent::Error(msg) => {
				assert!(msg.starts_with("malformed graph payload:"), "{msg}");
				assert!(msg.ends_with("showing the built-in sample graph"));
			}
			other => panic!("unexpected {other:?}"),
		}
		assert!(matches!(events[1], GraphEvent::Loaded(_)));
	}

	#[test]
	fn json_source_loads_like_parsed_data() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		let json = r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"sourceId":"a","targetId":"b"}]}"#;
		state.load_or_fallback(Some(&GraphSource::Json(json.to_string())));
		assert_eq!(state.graph().unwrap().node_count(), 2);
		assert!(matches!(state.take_events().as_slice(), [GraphEvent::Loaded(_)]));
	}

	#[test]
	fn reload_reports_dropped_selection() {
		let mut state = loaded();
		state.select_id("a");
		state.take_events();

		state.load(&abcd()).unwrap();
		assert!(state.selected_node().is_none());
		let events = state.take_events();
		assert_eq!(events[0], GraphEvent::SelectionCleared);
		assert!(matches!(events[1], GraphEvent::Loaded(_)));

		state.load(&abcd()).unwrap();
		assert!(matches!(state.take_events().as_slice(), [GraphEvent::Loaded(_)]));
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		assert!(state.load_json("{ nodes: ").is_err());
		assert!(state.graph().is_none());
		state
			.load_json(r#"{"nodes":[{"id":"x"},{"id":"y"}],"links":[{"source":"x","target":"y"}]}"#)
			.unwrap();
		assert_eq!(state.graph().unwrap().edge_count(), 1);
	}

	#[test]
	fn select_and_clear_emit_once() {
		let mut state = loaded();
		state.select_id("b");
		state.select_id("nope");
		state.clear_selection();
		state.clear_selection();
		let events = state.take_events();
		assert_eq!(events.len(), 2);
		match &events[0] {
			GraphEvent::NodeSelected(node) => {
				assert_eq!(node.id, "b");
				assert_eq!(node.degree, 2);
			}
			other => panic!("unexpected {other:?}"),
		}
		assert_eq!(events[1], GraphEvent::SelectionCleared);
	}

	#[test]
	fn click_through_pointer_handlers_selects_and_dims() {
		let mut state = loaded();
		let at = screen_of(&state, 0);
		state.pointer_down(at);
		state.pointer_up(at);
		assert_eq!(state.selected_node().map(|n| n.id), Some("a".to_string()));
		assert_eq!(state.highlight().node_visual(3).emphasis, Emphasis::Dimmed);

		let far = Point::new(-10_000.0, -10_000.0);
		state.pointer_down(far);
		state.pointer_up(far);
		assert!(state.selected_node().is_none());
		let events = state.take_events();
		assert!(matches!(events.last(), Some(GraphEvent::SelectionCleared)));
	}

	#[test]
	fn export_requires_a_graph() {
		let mut state = ForceGraphState::new(GraphConfig::default(), BOUNDS);
		assert_eq!(state.export(), Err(ExportError::EmptySurface));
		assert!(matches!(state.take_events().as_slice(), [GraphEvent::Error(_)]));

		let mut state = loaded();
		state.frame();
		state.export().unwrap();
		match state.take_events().as_slice() {
			[GraphEvent::ExportRequested { bytes, filename }] => {
				assert_eq!(filename, "knowledge-graph.svg");
				assert!(String::from_utf8_lossy(bytes).contains("<svg"));
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn reset_clears_selection_and_relayouts() {
		let mut state = loaded();
		for _ in 0..20 {
			state.frame();
		}
		state.toggle_simulation();
		assert!(!state.is_running());
		state.select_id("a");
		let before = state.simulation().unwrap().position(0);

		state.reset();
		assert!(state.is_running());
		assert!(state.highlight().selected().is_none());
		assert_ne!(state.simulation().unwrap().position(0), before);
		assert_eq!(state.simulation().unwrap().alpha(), 1.0);
	}

	#[test]
	fn frame_repaints_only_when_something_changed() {
		let mut state = loaded();
		assert!(state.frame());
		state.toggle_simulation();
		state.frame();
		assert!(!state.frame());
		state.zoom_in();
		assert!(state.frame());
		assert!(!state.frame());
		state.resize(Bounds::new(1024.0, 768.0));
		assert!(state.frame());
	}

	#[test]
	fn view_controls_respect_limits() {
		let mut state = loaded();
		for _ in 0..50 {
			state.zoom_in();
		}
		assert_eq!(state.viewport().scale(), 4.0);
		state.reset_view();
		assert_eq!(state.viewport().scale(), 1.0);
	}

	#[test]
	fn teardown_releases_everything() {
		let mut state = loaded();
		state.pointer_move(screen_of(&state, 0));
		state.teardown();
		assert!(state.simulation().is_none());
		assert!(state.graph().is_none());
		assert!(!state.tooltip().is_visible());
		assert!(state.scene().is_empty());
		assert!(state.toggle_simulation().is_none());
	}
}
