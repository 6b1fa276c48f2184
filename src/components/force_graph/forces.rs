//! Composable forces for the layout simulation.
//!
//! Every force only adjusts body velocities; positions are integrated by the
//! simulation afterwards. Coincident bodies are separated with a tiny
//! deterministic jiggle so no force ever divides by zero.

use super::geometry::Point;
use super::model::Graph;
use super::simulation::{Body, Lcg};

/// Per-tick inputs shared by all forces.
pub struct TickContext<'a> {
	/// Current simulation energy in `[0, 1]`.
	pub alpha: f64,
	/// Viewport center in graph space.
	pub center: Point,
	/// Seeded source for deterministic jiggle.
	pub rng: &'a mut Lcg,
}

impl TickContext<'_> {
	fn jiggle(&mut self) -> f64 {
		(self.rng.next_f64() - 0.5) * 1e-6
	}
}

/// A force acting on all bodies each tick.
pub trait Force {
	/// Short identifier used in logs.
	fn name(&self) -> &'static str;

	fn apply(&mut self, bodies: &mut [Body], ctx: &mut TickContext<'_>);
}

struct Link {
	source: usize,
	target: usize,
	distance: f64,
	strength: f64,
	bias: f64,
}

/// Spring between connected nodes. Heavier edges pull harder and rest shorter.
pub struct LinkForce {
	links: Vec<Link>,
}

impl LinkForce {
	/// Link force over every edge of `graph`.
	pub fn new(graph: &Graph, distance: f64, strength: f64) -> Self {
		let mut count = vec![0usize; graph.node_count()];
		for edge in graph.edges() {
			count[edge.source] += 1;
			count[edge.target] += 1;
		}
		let links = graph
			.edges()
			.iter()
			.filter(|e| e.source != e.target)
			.map(|e| {
				let (cs, ct) = (count[e.source] as f64, count[e.target] as f64);
				Link {
					source: e.source,
					target: e.target,
					distance: distance * (1.5 - e.weight),
					strength: strength * e.weight / cs.min(ct),
					bias: cs / (cs + ct),
				}
			})
			.collect();
		Self { links }
	}

	/// Effective rest length of each link, in edge order (self-loops excluded).
	pub fn rest_lengths(&self) -> impl Iterator<Item = f64> + '_ {
		self.links.iter().map(|l| l.distance)
	}
}

impl Force for LinkForce {
	fn name(&self) -> &'static str {
		"link"
	}

	fn apply(&mut self, bodies: &mut [Body], ctx: &mut TickContext<'_>) {
		for link in &self.links {
			let (s, t) = (&bodies[link.source], &bodies[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = ctx.jiggle();
			}
			if y == 0.0 {
				y = ctx.jiggle();
			}
			let dist = (x * x + y * y).sqrt();
			let l = (dist - link.distance) / dist * ctx.alpha * link.strength;
			x *= l;
			y *= l;

			let target = &mut bodies[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut bodies[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}
}

/// Pairwise charge; negative strength repels.
pub struct ManyBodyForce {
	strength: f64,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBodyForce {
	/// Pairwise charge; negative `strength` repels.
	pub fn new(strength: f64, distance_min: f64, distance_max: Option<f64>) -> Self {
		Self {
			strength,
			distance_min2: distance_min * distance_min,
			distance_max2: distance_max.map_or(f64::INFINITY, |d| d * d),
		}
	}
}

impl Force for ManyBodyForce {
	fn name(&self) -> &'static str {
		"charge"
	}

	fn apply(&mut self, bodies: &mut [Body], ctx: &mut TickContext<'_>) {
		let n = bodies.len();
		for i in 0..n {
			let (xi, yi) = (bodies[i].x, bodies[i].y);
			let (mut ax, mut ay) = (0.0, 0.0);
			for (j, other) in bodies.iter().enumerate() {
				if i == j {
					continue;
				}
				let mut x = other.x - xi;
				let mut y = other.y - yi;
				let mut l = x * x + y * y;
				if l >= self.distance_max2 {
					continue;
				}
				if x == 0.0 {
					x = ctx.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = ctx.jiggle();
					l += y * y;
				}
				if l < self.distance_min2 {
					l = (self.distance_min2 * l).sqrt();
				}
				let w = self.strength * ctx.alpha / l;
				ax += x * w;
				ay += y * w;
			}
			bodies[i].vx += ax;
			bodies[i].vy += ay;
		}
	}
}

/// Weak pull of every body toward the viewport center.
pub struct CenterForce {
	strength: f64,
}

impl CenterForce {
	/// Per-node pull toward the center.
	pub fn new(strength: f64) -> Self {
		Self { strength }
	}
}

impl Force for CenterForce {
	fn name(&self) -> &'static str {
		"center"
	}

	fn apply(&mut self, bodies: &mut [Body], ctx: &mut TickContext<'_>) {
		let k = self.strength * ctx.alpha;
		for body in bodies.iter_mut() {
			body.vx += (ctx.center.x - body.x) * k;
			body.vy += (ctx.center.y - body.y) * k;
		}
	}
}

/// Keeps body circles (`Body::radius`) from overlapping.
pub struct CollideForce {
	strength: f64,
	iterations: usize,
}

impl CollideForce {
	/// Collision resolution run `iterations` times per tick.
	pub fn new(strength: f64, iterations: usize) -> Self {
		Self {
			strength,
			iterations: iterations.max(1),
		}
	}
}

impl Force for CollideForce {
	fn name(&self) -> &'static str {
		"collide"
	}

	fn apply(&mut self, bodies: &mut [Body], ctx: &mut TickContext<'_>) {
		let n = bodies.len();
		for _ in 0..self.iterations {
			for i in 0..n {
				let ri = bodies[i].radius;
				let ri2 = ri * ri;
				let xi = bodies[i].x + bodies[i].vx;
				let yi = bodies[i].y + bodies[i].vy;
				for j in (i + 1)..n {
					let rj = bodies[j].radius;
					let r = ri + rj;
					let mut x = xi - bodies[j].x - bodies[j].vx;
					let mut y = yi - bodies[j].y - bodies[j].vy;
					let mut l = x * x + y * y;
					if l >= r * r {
						continue;
					}
					if x == 0.0 {
						x = ctx.jiggle();
						l += x * x;
					}
					if y == 0.0 {
						y = ctx.jiggle();
						l += y * y;
					}
					let dist = l.sqrt();
					let push = (r - dist) / dist * self.strength;
					x *= push;
					y *= push;
					let rj2 = rj * rj;
					let share = rj2 / (ri2 + rj2);
					bodies[i].vx += x * share;
					bodies[i].vy += y * share;
					bodies[j].vx -= x * (1.0 - share);
					bodies[j].vy -= y * (1.0 - share);
				}
			}
		}
	}
}
