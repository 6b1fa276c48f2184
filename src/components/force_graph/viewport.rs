//! Pan and zoom transform for the rendered scene.
//!
//! The transform maps graph space to screen space as `screen = graph * k +
//! (x, y)`. It never touches node positions, so it can change freely while
//! the simulation runs.

use serde::Deserialize;

use super::geometry::Point;

/// Zoom limits and step factors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
	/// Smallest zoom factor.
	pub min_scale: f64,
	/// Largest zoom factor.
	pub max_scale: f64,
	/// Multiplier for the zoom-in control.
	pub zoom_in_factor: f64,
	/// Multiplier for the zoom-out control.
	pub zoom_out_factor: f64,
	/// Relative scale change per wheel notch.
	pub wheel_step: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 4.0,
			zoom_in_factor: 1.2,
			zoom_out_factor: 0.8,
			wheel_step: 0.1,
		}
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in pixels.
	pub x: f64,
	/// Vertical translation in pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No pan, 100% zoom.
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Map canvas pixels to graph coordinates.
	pub fn screen_to_graph(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Map graph coordinates to canvas pixels.
	pub fn graph_to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}
}

/// A [`ViewTransform`] together with the limits it must respect.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
	transform: ViewTransform,
	config: ViewportConfig,
}

impl Viewport {
	/// Viewport at the identity transform.
	pub fn new(config: ViewportConfig) -> Self {
		Self {
			transform: ViewTransform::IDENTITY,
			config,
		}
	}

	/// Current transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Current zoom factor.
	pub fn scale(&self) -> f64 {
		self.transform.k
	}

	/// Active settings.
	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	/// Zoom in by the control factor about `anchor` (screen space).
	pub fn zoom_in(&mut self, anchor: Point) -> bool {
		self.zoom_by(self.config.zoom_in_factor, anchor)
	}

	/// Zoom out by the control factor about `anchor` (screen space).
	pub fn zoom_out(&mut self, anchor: Point) -> bool {
		self.zoom_by(self.config.zoom_out_factor, anchor)
	}

	/// Wheel zoom; positive `delta_y` zooms out, like a browser page.
	pub fn zoom_wheel(&mut self, delta_y: f64, anchor: Point) -> bool {
		if delta_y == 0.0 {
			return false;
		}
		let factor = if delta_y > 0.0 {
			1.0 - self.config.wheel_step
		} else {
			1.0 + self.config.wheel_step
		};
		self.zoom_by(factor, anchor)
	}

	/// Multiply the scale by `factor`, clamped to the configured range, keeping
	/// the graph point under `anchor` fixed on screen. Returns whether the
	/// transform changed.
	pub fn zoom_by(&mut self, factor: f64, anchor: Point) -> bool {
		if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
			return false;
		}
		let t = &mut self.transform;
		let new_k = (t.k * factor).clamp(self.config.min_scale, self.config.max_scale);
		if new_k == t.k {
			return false;
		}
		let ratio = new_k / t.k;
		t.x = anchor.x - (anchor.x - t.x) * ratio;
		t.y = anchor.y - (anchor.y - t.y) * ratio;
		t.k = new_k;
		true
	}

	/// Translate by `(dx, dy)` pixels. Non-finite deltas are ignored.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.transform.x += dx;
			self.transform.y += dy;
		}
	}

	/// Back to the identity transform.
	pub fn reset(&mut self) {
		self.transform = ViewTransform::IDENTITY;
	}

	/// Map canvas pixels to graph coordinates.
	pub fn screen_to_graph(&self, p: Point) -> Point {
		self.transform.screen_to_graph(p)
	}
}
