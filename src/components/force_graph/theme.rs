//! Visual theming for the knowledge graph.
//!
//! Colors for entities come from the fixed entity type table in
//! [`EntityType::color`](super::model::EntityType::color); the theme only covers
//! the surface around them.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Parses `#RRGGBB`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		if digits.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	/// CSS color: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_hex()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// `#rrggbb`, ignoring alpha.
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line color.
	pub color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients on canvas
	pub use_gradient: bool,
	/// Circle outline
	pub stroke: Color,
	/// Outline drawn around the selected node
	pub selected_ring: Color,
}

/// Label text style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
	/// CSS font family.
	pub font_family: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Relationship lines.
	pub edge: EdgeStyle,
	/// Entity circles.
	pub node: NodeStyle,
	/// Labels.
	pub label: LabelStyle,
}

impl Theme {
	/// Dark dashboard theme (default)
	pub fn slate() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(15, 23, 42),
				color_secondary: Color::rgb(30, 41, 59),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(148, 163, 184, 0.6),
			},
			node: NodeStyle {
				use_gradient: true,
				stroke: Color::rgb(255, 255, 255),
				selected_ring: Color::rgb(250, 204, 21),
			},
			label: LabelStyle {
				color: Color::rgb(226, 232, 240),
				font_family: "sans-serif",
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::slate()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_round_trips_through_css() {
		let color = Color::from_hex("#3b82f6").unwrap();
		assert_eq!(color, Color::rgb(0x3b, 0x82, 0xf6));
		assert_eq!(color.to_css(), "#3b82f6");
	}

	#[test]
	fn rejects_malformed_hex() {
		assert!(Color::from_hex("3b82f6").is_none());
		assert!(Color::from_hex("#3b82").is_none());
		assert!(Color::from_hex("#zz82f6").is_none());
	}

	#[test]
	fn translucent_colors_render_as_rgba() {
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn lighten_and_darken_saturate() {
		let c = Color::rgb(100, 100, 100);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}
}
