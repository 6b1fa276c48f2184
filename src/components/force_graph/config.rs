//! Aggregate configuration for one graph view.
//!
//! Every section is optional in JSON; missing fields take their defaults.
//!
//! ```json
//! { "simulation": { "chargeStrength": -200 }, "interaction": { "keepFixed": true } }
//! ```

use serde::Deserialize;

use super::highlight::HighlightConfig;
use super::interaction::InteractionConfig;
use super::simulation::SimulationConfig;
use super::viewport::ViewportConfig;

/// Every tunable of the graph view, read from the `graph-config` script element.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
	/// Layout forces and cooling.
	pub simulation: SimulationConfig,
	/// Zoom limits and steps.
	pub viewport: ViewportConfig,
	/// Pointer behavior.
	pub interaction: InteractionConfig,
	/// Dimming levels.
	pub highlight: HighlightConfig,
}

impl GraphConfig {
	/// Parse a JSON settings object; missing keys take their defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults_elsewhere() {
		let config = GraphConfig::from_json(
			r#"{ "simulation": { "chargeStrength": -120, "seed": 7 }, "interaction": { "keepFixed": true } }"#,
		)
		.unwrap();
		assert_eq!(config.simulation.charge_strength, -120.0);
		assert_eq!(config.simulation.seed, 7);
		assert_eq!(config.simulation.link_distance, SimulationConfig::default().link_distance);
		assert!(config.interaction.keep_fixed);
		assert_eq!(config.viewport, ViewportConfig::default());
		assert_eq!(config.highlight, HighlightConfig::default());
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(GraphConfig::from_json("{}").unwrap(), GraphConfig::default());
		assert!(GraphConfig::from_json("[1, 2]").is_err());
	}
}
