//! Force-directed layout engine.
//!
//! A [`Simulation`] is an owned instance built from a loaded [`Graph`]. The
//! caller holds it, drives it from its frame scheduler and must [`stop`] it
//! before dropping the graph it was built from.
//!
//! Energy follows the usual cooling schedule: `alpha` starts at 1 and decays
//! toward `alpha_target`. Once it falls below `alpha_min` the engine is
//! cooled and ticks become no-ops until something reheats it (a drag, a
//! reset). Positions are owned by the engine except for pinned bodies, whose
//! position is written by the interaction layer.
//!
//! [`stop`]: Simulation::stop

use log::{debug, warn};
use serde::Deserialize;

use super::forces::{CenterForce, CollideForce, Force, LinkForce, ManyBodyForce, TickContext};
use super::geometry::{Bounds, Point};
use super::model::{Graph, NodeIdx};

/// Tuning for the layout forces and the cooling schedule.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	/// Rest length of a link with weight 0.5.
	pub link_distance: f64,
	/// Link strength multiplier (scaled by weight and endpoint degree).
	pub link_strength: f64,
	/// Pairwise charge; negative values repel.
	pub charge_strength: f64,
	/// Charge distance floor, avoiding blow-ups for close nodes.
	pub charge_distance_min: f64,
	/// Charge cutoff; `None` means unlimited.
	pub charge_distance_max: Option<f64>,
	/// Pull toward the viewport center.
	pub center_strength: f64,
	/// Added to each node's size to get its collision radius.
	pub collision_margin: f64,
	/// Fraction of an overlap resolved per iteration.
	pub collision_strength: f64,
	/// Collision passes per tick.
	pub collision_iterations: usize,
	/// Below this alpha the layout is cooled and stops integrating.
	pub alpha_min: f64,
	/// Per-tick alpha decay toward `alpha_target`.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// `alpha_target` while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Simulation steps per animation frame.
	pub ticks_per_frame: usize,
	/// Max node speed considered "at rest".
	pub settle_epsilon: f64,
	/// Consecutive calm ticks before the layout counts as settled.
	pub settle_ticks: usize,
	/// Seed for initial placement and jiggle.
	pub seed: u64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			link_strength: 1.0,
			charge_strength: -300.0,
			charge_distance_min: 1.0,
			charge_distance_max: None,
			center_strength: 0.05,
			collision_margin: 4.0,
			collision_strength: 1.0,
			collision_iterations: 2,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			ticks_per_frame: 1,
			settle_epsilon: 0.05,
			settle_ticks: 30,
			seed: 42,
		}
	}
}

/// Lifecycle of a simulation instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
	/// Built, positions placed, not ticking yet.
	Idle,
	/// Integrating on every frame.
	Running,
	/// Stopped by the user; can be resumed.
	Paused,
	/// Terminal; the instance must be replaced to simulate again.
	Stopped,
}

/// Linear congruential generator used for placement and jiggle.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	/// Generator starting at `seed`.
	pub fn new(seed: u64) -> Self {
		Self(seed % Self::M)
	}

	/// Uniform value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = (Self::A.wrapping_mul(self.0).wrapping_add(Self::C)) % Self::M;
		self.0 as f64 / Self::M as f64
	}
}

/// Physical state of one node.
#[derive(Clone, Debug)]
pub struct Body {
	pub(crate) x: f64,
	pub(crate) y: f64,
	pub(crate) vx: f64,
	pub(crate) vy: f64,
	/// Collision radius.
	pub(crate) radius: f64,
	/// Pinned position, if any.
	pub(crate) fixed: Option<Point>,
}

impl Body {
	pub(crate) fn at(p: Point, radius: f64) -> Self {
		Self {
			x: p.x,
			y: p.y,
			vx: 0.0,
			vy: 0.0,
			radius,
			fixed: None,
		}
	}

	fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}
}

/// Position-update callback, invoked after each integrated tick.
pub type TickListener = Box<dyn FnMut(&Simulation)>;

/// Iterative force-directed layout over one graph.
pub struct Simulation {
	bodies: Vec<Body>,
	forces: Vec<Box<dyn Force>>,
	config: SimulationConfig,
	status: SimulationStatus,
	alpha: f64,
	alpha_target: f64,
	cooled: bool,
	rng: Lcg,
	bounds: Bounds,
	calm_ticks: usize,
	tick_count: u64,
	recovered: usize,
	listeners: Vec<TickListener>,
}

impl Simulation {
	/// Build an idle simulation with the standard link, charge, center and
	/// collision forces, placing nodes pseudo-randomly inside `bounds`.
	pub fn new(graph: &Graph, config: SimulationConfig, bounds: Bounds) -> Self {
		let mut rng = Lcg::new(config.seed);
		let bodies = graph
			.nodes()
			.iter()
			.map(|node| {
				let p = random_point(&mut rng, bounds);
				Body::at(p, node.size + config.collision_margin)
			})
			.collect();
		let forces: Vec<Box<dyn Force>> = vec![
			Box::new(LinkForce::new(graph, config.link_distance, config.link_strength)),
			Box::new(ManyBodyForce::new(
				config.charge_strength,
				config.charge_distance_min,
				config.charge_distance_max,
			)),
			Box::new(CenterForce::new(config.center_strength)),
			Box::new(CollideForce::new(
				config.collision_strength,
				config.collision_iterations,
			)),
		];

		Self {
			bodies,
			forces,
			status: SimulationStatus::Idle,
			alpha: 1.0,
			alpha_target: 0.0,
			cooled: false,
			rng,
			bounds,
			calm_ticks: 0,
			tick_count: 0,
			recovered: 0,
			listeners: Vec::new(),
			config,
		}
	}

	/// Append a custom force; it runs after the built-in ones.
	pub fn add_force(&mut self, force: Box<dyn Force>) {
		debug!("simulation: adding force `{}`", force.name());
		self.forces.push(force);
	}

	/// Names of the registered forces, in application order.
	pub fn force_names(&self) -> Vec<&'static str> {
		self.forces.iter().map(|f| f.name()).collect()
	}

	/// Register a position-update callback.
	pub fn on_tick(&mut self, listener: impl FnMut(&Simulation) + 'static) {
		if self.status != SimulationStatus::Stopped {
			self.listeners.push(Box::new(listener));
		}
	}

	/// Current lifecycle state.
	pub fn status(&self) -> SimulationStatus {
		self.status
	}

	/// Begin (or resume) ticking. A stopped simulation stays stopped.
	pub fn start(&mut self) {
		match self.status {
			SimulationStatus::Idle | SimulationStatus::Paused => {
				self.status = SimulationStatus::Running;
			}
			SimulationStatus::Running => {}
			SimulationStatus::Stopped => debug!("simulation: start ignored, already stopped"),
		}
	}

	/// Stop ticking until resumed. No-op unless running.
	pub fn pause(&mut self) {
		if self.status == SimulationStatus::Running {
			self.status = SimulationStatus::Paused;
		}
	}

	/// Play/pause toggle. Returns the new status.
	pub fn toggle(&mut self) -> SimulationStatus {
		match self.status {
			SimulationStatus::Running => self.pause(),
			_ => self.start(),
		}
		self.status
	}

	/// Halt for good and drop all tick listeners.
	pub fn stop(&mut self) {
		self.status = SimulationStatus::Stopped;
		self.listeners.clear();
	}

	/// Status is `Running`.
	pub fn is_running(&self) -> bool {
		self.status == SimulationStatus::Running
	}

	/// Energy dropped below `alpha_min`; ticking is suspended until reheated.
	pub fn is_cooled(&self) -> bool {
		self.cooled
	}

	/// Running and not cooled: the next tick will move nodes.
	pub fn is_active(&self) -> bool {
		self.is_running() && !self.cooled
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy the simulation decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Integrated ticks since start.
	pub fn tick_count(&self) -> u64 {
		self.tick_count
	}

	/// Number of bodies reset after reaching a non-finite position.
	pub fn recovered_count(&self) -> usize {
		self.recovered
	}

	/// Raise the energy to at least `alpha` and wake the engine.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
		self.cooled = false;
		self.calm_ticks = 0;
	}

	/// Advance one step. Returns `false` when nothing moved.
	pub fn tick(&mut self) -> bool {
		if !self.is_active() {
			return false;
		}
		self.step();
		true
	}

	/// Run the configured number of steps for one animation frame.
	pub fn step_frame(&mut self) -> bool {
		let mut advanced = false;
		for _ in 0..self.config.ticks_per_frame.max(1) {
			if !self.tick() {
				break;
			}
			advanced = true;
		}
		advanced
	}

	fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		let mut ctx = TickContext {
			alpha: self.alpha,
			center: self.bounds.center(),
			rng: &mut self.rng,
		};
		for force in &mut self.forces {
			force.apply(&mut self.bodies, &mut ctx);
		}

		let keep = 1.0 - self.config.velocity_decay;
		let mut max_speed: f64 = 0.0;
		for body in &mut self.bodies {
			match body.fixed {
				Some(p) => {
					body.x = p.x;
					body.y = p.y;
					body.vx = 0.0;
					body.vy = 0.0;
				}
				None => {
					body.vx *= keep;
					body.vy *= keep;
					body.x += body.vx;
					body.y += body.vy;
				}
			}
			max_speed = max_speed.max(body.speed());
		}
		self.recover_non_finite();

		self.tick_count += 1;
		if max_speed < self.config.settle_epsilon {
			self.calm_ticks += 1;
		} else {
			self.calm_ticks = 0;
		}
		if self.alpha < self.config.alpha_min {
			self.cooled = true;
			debug!("simulation: cooled after {} ticks", self.tick_count);
		}

		let mut listeners = std::mem::take(&mut self.listeners);
		for listener in &mut listeners {
			listener(&*self);
		}
		// Listeners registered during the callbacks are kept as well.
		listeners.append(&mut self.listeners);
		self.listeners = listeners;
	}

	/// Reset any body whose position blew up, keeping the rest of the layout.
	fn recover_non_finite(&mut self) {
		let center = self.bounds.center();
		for (idx, body) in self.bodies.iter_mut().enumerate() {
			if body.x.is_finite() && body.y.is_finite() && body.vx.is_finite() && body.vy.is_finite() {
				continue;
			}
			warn!("simulation: node #{idx} reached a non-finite position, resetting");
			let p = body.fixed.filter(|p| p.is_finite()).unwrap_or_else(|| {
				Point::new(
					center.x + (self.rng.next_f64() - 0.5),
					center.y + (self.rng.next_f64() - 0.5),
				)
			});
			body.x = p.x;
			body.y = p.y;
			body.vx = 0.0;
			body.vy = 0.0;
			self.recovered += 1;
		}
	}

	/// Velocity has stayed below `settle_epsilon` for `settle_ticks` ticks.
	pub fn is_settled(&self) -> bool {
		self.calm_ticks >= self.config.settle_ticks.max(1)
	}

	/// Number of simulated nodes.
	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	/// Current position, or `None` for an unknown index or a position that
	/// is not finite.
	pub fn position(&self, idx: NodeIdx) -> Option<Point> {
		self.bodies
			.get(idx)
			.map(Body::position)
			.filter(|p| p.is_finite())
	}

	/// Node `idx` is held in place.
	pub fn is_pinned(&self, idx: NodeIdx) -> bool {
		self.bodies.get(idx).is_some_and(|b| b.fixed.is_some())
	}

	/// Fix a node at its current position and reheat for dragging.
	///
	/// Returns `false` (and changes nothing) when the node is unknown or
	/// already pinned.
	pub fn pin(&mut self, idx: NodeIdx) -> bool {
		let Some(body) = self.bodies.get_mut(idx) else {
			return false;
		};
		if body.fixed.is_some() {
			return false;
		}
		body.fixed = Some(body.position());
		self.alpha_target = self.config.drag_alpha_target;
		self.cooled = false;
		self.calm_ticks = 0;
		true
	}

	/// Release a pinned node back to the simulation.
	///
	/// Returns `false` (and changes nothing) when the node is unknown or not
	/// pinned.
	pub fn unpin(&mut self, idx: NodeIdx) -> bool {
		let Some(body) = self.bodies.get_mut(idx) else {
			return false;
		};
		if body.fixed.take().is_none() {
			return false;
		}
		self.alpha_target = 0.0;
		true
	}

	/// Move a pinned node. Non-finite targets and unpinned nodes are ignored.
	pub fn move_pinned(&mut self, idx: NodeIdx, p: Point) -> bool {
		if !p.is_finite() {
			return false;
		}
		match self.bodies.get_mut(idx) {
			Some(body) if body.fixed.is_some() => {
				body.fixed = Some(p);
				body.x = p.x;
				body.y = p.y;
				body.vx = 0.0;
				body.vy = 0.0;
				true
			}
			_ => false,
		}
	}

	/// End a drag: let the energy decay again.
	pub fn cool_down(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Re-place every node pseudo-randomly, clear pins and restart at full energy.
	pub fn randomize(&mut self, seed: u64) {
		self.rng = Lcg::new(seed);
		for body in &mut self.bodies {
			let p = random_point(&mut self.rng, self.bounds);
			body.x = p.x;
			body.y = p.y;
			body.vx = 0.0;
			body.vy = 0.0;
			body.fixed = None;
		}
		self.alpha = 1.0;
		self.alpha_target = 0.0;
		self.cooled = false;
		self.calm_ticks = 0;
	}

	/// Follow a resized viewport; the center force pulls toward the new middle.
	pub fn set_bounds(&mut self, bounds: Bounds) {
		self.bounds = bounds;
	}

	/// Area the layout is centered in.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Active settings.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}
}

fn random_point(rng: &mut Lcg, bounds: Bounds) -> Point {
	Point::new(rng.next_f64() * bounds.width, rng.next_f64() * bounds.height)
}
