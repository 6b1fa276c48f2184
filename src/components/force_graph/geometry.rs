//! Plane geometry shared by the simulation, viewport and scene.

/// A point in either graph space or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	/// Both coordinates are finite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Size of the drawing area in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Bounds {
	/// Bounds of `width` by `height` pixels.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Midpoint of the area.
	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}
