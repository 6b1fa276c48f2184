//! Zoom-dependent sizing for strokes, labels and hit testing.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: graph coordinates. Values scale with zoom.
//! - **Screen-space**: canvas pixels. Values stay constant regardless of zoom.
//!
//! Node radii are always world-space (`Node::size`); everything that should
//! stay readable at any zoom level is configured here.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug, PartialEq)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	/// Alpha multiplier for zoom level `k`.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Edge width at weight 1; actual width is `edge_width * sqrt(weight)`.
	pub edge_width: f64,
	/// How the edge width follows zoom.
	pub edge_behavior: ScaleBehavior,
	/// White outline around node circles.
	pub node_stroke: f64,
	/// How the node outline follows zoom.
	pub node_stroke_behavior: ScaleBehavior,
	/// Ring around the selected node.
	pub ring_width: f64,
	/// Gap between the node circle and the ring.
	pub ring_offset: f64,
	/// Label font size.
	pub label_size: f64,
	/// How the label size follows zoom.
	pub label_behavior: ScaleBehavior,
	/// Labels fade out when zoomed far out.
	pub label_alpha: AlphaBehavior,
	/// Gap between the node circle and its label.
	pub label_gap: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			edge_width: 3.0,
			edge_behavior: ScaleBehavior::World,
			node_stroke: 1.5,
			node_stroke_behavior: ScaleBehavior::Screen,
			ring_width: 2.5,
			ring_offset: 3.0,
			label_size: 11.0,
			label_behavior: ScaleBehavior::Clamped {
				min_screen: 9.0,
				max_screen: 16.0,
			},
			label_alpha: AlphaBehavior::Fade {
				zero_alpha_k: 0.25,
				full_alpha_k: 0.6,
			},
			label_gap: 4.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame. All sizes are world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Edge width at weight 1.
	pub edge_width: f64,
	/// Node outline width.
	pub node_stroke: f64,
	/// Selection ring width.
	pub ring_width: f64,
	/// Gap between node and selection ring.
	pub ring_offset: f64,
	/// Label font size.
	pub label_size: f64,
	/// Label alpha multiplier.
	pub label_alpha: f64,
	/// Gap between node and label.
	pub label_gap: f64,
}

impl ScaledValues {
	/// Resolve `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			edge_width: config.edge_behavior.apply(config.edge_width, k),
			node_stroke: config.node_stroke_behavior.apply(config.node_stroke, k),
			ring_width: config.ring_width / k,
			ring_offset: config.ring_offset / k,
			label_size: config.label_behavior.apply(config.label_size, k),
			label_alpha: config.label_alpha.apply(k),
			label_gap: config.label_gap / k,
		}
	}
}
