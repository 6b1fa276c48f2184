//! Force-directed knowledge graph view.
//!
//! Renders an interactive force-directed graph of entities and relationships
//! on an HTML canvas with:
//! - A composable force simulation (link, charge, center, collision)
//! - Node dragging, background panning and anchored wheel zoom
//! - Neighborhood highlighting on click and label search
//! - A hover tooltip and SVG export
//!
//! Everything except [`render`] and [`component`] is plain Rust and runs
//! without a browser.
//!
//! # Example
//!
//! ```ignore
//! use kg_graph_view::{ForceGraphCanvas, GraphData, GraphEdge, GraphNode, GraphSource};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::new("ada").with_label("Ada Lovelace").with_type("PERSON"),
//!         GraphNode::new("engine").with_label("Analytical Engine").with_type("PRODUCT"),
//!     ],
//!     edges: vec![GraphEdge::new("e1", "ada", "engine").with_relation("designed")],
//! };
//!
//! view! { <ForceGraphCanvas data=Signal::derive(move || Some(GraphSource::from(data.clone()))) fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod forces;
pub mod geometry;
pub mod highlight;
pub mod interaction;
pub mod model;
mod render;
pub mod sample;
pub mod scale;
pub mod scene;
pub mod simulation;
pub mod state;
pub mod stats;
pub mod theme;
pub mod tooltip;
pub mod types;
pub mod viewport;

pub use component::ForceGraphCanvas;
pub use config::GraphConfig;
pub use error::{ExportError, GraphError, GraphResult, ValidationError};
pub use events::{GraphEvent, SelectedNode};
pub use model::{EntityType, Graph};
pub use simulation::{Simulation, SimulationConfig, SimulationStatus};
pub use state::ForceGraphState;
pub use stats::GraphStats;
pub use theme::Theme;
pub use types::{GraphData, GraphEdge, GraphNode, GraphSource};
