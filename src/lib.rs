//! kg-graph-view: interactive force-directed knowledge graph viewer.
//!
//! This crate provides a WASM-based graph visualization component that renders
//! entities and their relationships with a physics-based layout, pan/zoom,
//! neighborhood highlighting, label search and SVG export.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlScriptElement, Url, Window};

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, ForceGraphState, GraphConfig, GraphData, GraphEdge, GraphError, GraphEvent, GraphNode,
	GraphSource, GraphStats, SelectedNode,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kg-graph-view: logging initialized");
}

/// Text of the script element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Raw graph payload from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }; it is parsed by
/// the view so a malformed payload is reported with its reason.
fn load_graph_source() -> Option<GraphSource> {
	let json_text = script_text("graph-data")?;
	info!("kg-graph-view: found {} bytes of graph data", json_text.len());
	Some(GraphSource::Json(json_text))
}

/// Load view settings from a script element with id="graph-config".
fn load_graph_config() -> GraphConfig {
	let Some(json_text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("kg-graph-view: ignoring malformed graph config: {}", e);
		GraphConfig::default()
	})
}

/// Offer `bytes` to the user as a file download.
fn download(bytes: &[u8], filename: &str, mime: &str) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or("no window")?;
	let document = window.document().ok_or("no document")?;

	let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor.click();
	Url::revoke_object_url(&url)
}

/// Main application component.
/// Loads graph data and settings from the DOM and renders the viewer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_source = load_graph_source();
	let graph_signal = Signal::derive(move || graph_source.clone());
	let config = load_graph_config();

	let (summary, set_summary) = signal(String::new());
	let (error, set_error) = signal(None::<String>);
	let (selected, set_selected) = signal(None::<SelectedNode>);

	let on_loaded = Callback::new(move |stats: GraphStats| {
		set_summary.set(format!("{} entities, {} relationships", stats.total_nodes, stats.total_edges));
	});
	let on_error = Callback::new(move |message: String| {
		set_error.set(Some(message));
	});
	let on_node_selected = Callback::new(move |node: SelectedNode| {
		set_selected.set(Some(node));
	});
	let on_selection_cleared = Callback::new(move |_: ()| {
		set_selected.set(None);
	});
	let on_export = Callback::new(move |(bytes, filename): (Vec<u8>, String)| {
		match download(&bytes, &filename, components::force_graph::export::SVG_MIME) {
			Ok(()) => info!("kg-graph-view: exported {}", filename),
			Err(e) => {
				warn!("kg-graph-view: download failed: {:?}", e);
				set_error.set(Some("download failed".to_string()));
			}
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph_signal
				config=config
				fullscreen=true
				on_loaded=on_loaded
				on_error=on_error
				on_node_selected=on_node_selected
				on_selection_cleared=on_selection_cleared
				on_export=on_export
			/>
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">"Click a node to focus its neighborhood. Drag nodes to reposition. Scroll to zoom."</p>
				<p class="status">{move || summary.get()}</p>
				{move || error.get().map(|message| view! { <p class="error">{message}</p> })}
				{move || {
					selected
						.get()
						.map(|node| {
							view! {
								<p class="selection">
									{format!("{} ({}), {} connection(s)", node.label, node.entity_type, node.degree)}
								</p>
							}
						})
				}}
			</div>
		</div>
	}
}
