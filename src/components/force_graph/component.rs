//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element plus a toolbar and a single
//! tooltip overlay, and wires mouse/wheel handlers into [`ForceGraphState`].
//! An animation loop runs via `requestAnimationFrame`, stepping the
//! simulation and repainting only when something changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::events::{GraphEvent, SelectedNode};
use super::geometry::{Bounds, Point};
use super::render;
use super::state::ForceGraphState;
use super::stats::GraphStats;
use super::types::GraphSource;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Host callbacks, one per [`GraphEvent`] variant.
#[derive(Clone, Copy)]
struct Callbacks {
	on_node_selected: Option<Callback<SelectedNode>>,
	on_selection_cleared: Option<Callback<()>>,
	on_export: Option<Callback<(Vec<u8>, String)>>,
	on_error: Option<Callback<String>>,
	on_loaded: Option<Callback<GraphStats>>,
}

impl Callbacks {
	fn dispatch(&self, event: GraphEvent) {
		match event {
			GraphEvent::NodeSelected(node) => {
				if let Some(cb) = self.on_node_selected {
					cb.run(node);
				}
			}
			GraphEvent::SelectionCleared => {
				if let Some(cb) = self.on_selection_cleared {
					cb.run(());
				}
			}
			GraphEvent::ExportRequested { bytes, filename } => {
				if let Some(cb) = self.on_export {
					cb.run((bytes, filename));
				}
			}
			GraphEvent::Error(message) => {
				if let Some(cb) = self.on_error {
					cb.run(message);
				}
			}
			GraphEvent::Loaded(stats) => {
				if let Some(cb) = self.on_loaded {
					cb.run(stats);
				}
			}
		}
	}
}

/// What the tooltip overlay shows, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
struct TooltipView {
	label: String,
	entity_type: &'static str,
	degree: String,
	x: f64,
	y: f64,
}

impl TooltipView {
	fn from_state(state: &ForceGraphState) -> Option<Self> {
		let tooltip = state.tooltip();
		let content = tooltip.content()?;
		let at = tooltip.position();
		Some(Self {
			label: content.label.clone(),
			entity_type: content.entity_type,
			degree: content.degree_text(),
			x: at.x,
			y: at.y,
		})
	}
}

/// Browser resources held for the lifetime of the component.
struct LoopHandles {
	state: Rc<RefCell<ForceGraphState>>,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl LoopHandles {
	fn release(&self) {
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize_cb.borrow_mut().take() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		self.state.borrow_mut().teardown();
	}
}

/// Renders an interactive knowledge graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal, parsed or as raw JSON;
/// `None` (or a payload that fails to parse or validate before any graph is
/// shown) displays the built-in sample graph and reports the reason through
/// `on_error`. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to fill
/// the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to show; reloaded whenever the signal changes.
	#[prop(into)]
	data: Signal<Option<GraphSource>>,
	/// View settings; defaults when omitted.
	#[prop(optional)]
	config: Option<GraphConfig>,
	/// Fill the window and follow its size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
	/// A node was clicked.
	#[prop(optional, into)]
	on_node_selected: Option<Callback<SelectedNode>>,
	/// The selection went away.
	#[prop(optional, into)]
	on_selection_cleared: Option<Callback<()>>,
	/// An SVG export is ready: bytes and suggested filename.
	#[prop(optional, into)]
	on_export: Option<Callback<(Vec<u8>, String)>>,
	/// A user-visible failure.
	#[prop(optional, into)]
	on_error: Option<Callback<String>>,
	/// A graph was installed.
	#[prop(optional, into)]
	on_loaded: Option<Callback<GraphStats>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (w0, h0) = FALLBACK_SIZE;
	let state = Rc::new(RefCell::new(ForceGraphState::new(
		config.unwrap_or_default(),
		Bounds::new(w0, h0),
	)));
	let (tooltip, set_tooltip) = signal(None::<TooltipView>);
	let (running, set_running) = signal(false);
	let (matches, set_matches) = signal(None::<usize>);
	let callbacks = Callbacks {
		on_node_selected,
		on_selection_cleared,
		on_export,
		on_error,
		on_loaded,
	};

	// Mirror state into signals and deliver queued events to the host.
	let sync: Rc<dyn Fn()> = {
		let state = Rc::clone(&state);
		Rc::new(move || {
			let (events, tip, is_running, match_count) = {
				let mut s = state.borrow_mut();
				(
					s.take_events(),
					TooltipView::from_state(&s),
					s.is_running(),
					s.search_matches(),
				)
			};
			if tooltip.with_untracked(|t| *t != tip) {
				set_tooltip.set(tip);
			}
			set_running.set(is_running);
			set_matches.set(match_count);
			for event in events {
				callbacks.dispatch(event);
			}
		})
	};

	let handles = LoopHandles {
		state: Rc::clone(&state),
		frame_id: Rc::new(Cell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		resize_cb: Rc::new(RefCell::new(None)),
	};
	let (state_init, frame_id, animate, resize_cb) = (
		Rc::clone(&state),
		Rc::clone(&handles.frame_id),
		Rc::clone(&handles.animate),
		Rc::clone(&handles.resize_cb),
	);
	let handles = StoredValue::new_local(handles);
	on_cleanup(move || {
		let _ = handles.try_with_value(LoopHandles::release);
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("graph: canvas has no 2d context");
			return;
		};
		state_init.borrow_mut().resize(measure(&canvas, fullscreen, width, height));

		if fullscreen {
			let (state_resize, canvas_resize) = (Rc::clone(&state_init), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let bounds = measure(&canvas_resize, true, None, None);
				state_resize.borrow_mut().resize(bounds);
			}));
			if let Some(cb) = resize_cb.borrow().as_ref() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, frame_inner) =
			(Rc::clone(&state_init), Rc::clone(&animate), Rc::clone(&frame_id));
		*animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut s = state_anim.borrow_mut();
				if s.frame() {
					render::draw(&s.scene(), &ctx, &s.style().theme);
				}
			}
			let next = animate_inner.borrow().as_ref().and_then(|cb| {
				web_sys::window()?
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok()
			});
			frame_inner.set(next);
		}));
		if let Some(cb) = animate.borrow().as_ref() {
			frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let (state_data, sync_data) = (Rc::clone(&state), Rc::clone(&sync));
	Effect::new(move |_| {
		let payload = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		{
			let mut s = state_data.borrow_mut();
			s.resize(measure(&canvas, fullscreen, width, height));
			s.load_or_fallback(payload.as_ref());
		}
		sync_data();
	});

	let (state_md, sync_md) = (Rc::clone(&state), Rc::clone(&sync));
	let on_mousedown = move |ev: MouseEvent| {
		let Some(p) = local_point(canvas_ref, &ev) else {
			return;
		};
		state_md.borrow_mut().pointer_down(p);
		sync_md();
	};

	let (state_mm, sync_mm) = (Rc::clone(&state), Rc::clone(&sync));
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = local_point(canvas_ref, &ev) else {
			return;
		};
		state_mm.borrow_mut().pointer_move(p);
		sync_mm();
	};

	let (state_mu, sync_mu) = (Rc::clone(&state), Rc::clone(&sync));
	let on_mouseup = move |ev: MouseEvent| {
		let Some(p) = local_point(canvas_ref, &ev) else {
			return;
		};
		state_mu.borrow_mut().pointer_up(p);
		sync_mu();
	};

	let (state_ml, sync_ml) = (Rc::clone(&state), Rc::clone(&sync));
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().pointer_leave();
		sync_ml();
	};

	let (state_wh, sync_wh) = (Rc::clone(&state), Rc::clone(&sync));
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(p) = local_point(canvas_ref, &ev) else {
			return;
		};
		state_wh.borrow_mut().wheel(ev.delta_y(), p);
		sync_wh();
	};

	let (state_search, sync_search) = (Rc::clone(&state), Rc::clone(&sync));
	let on_search = move |ev| {
		state_search.borrow_mut().set_search(&event_target_value(&ev));
		sync_search();
	};

	let tooltip_style = move || {
		tooltip
			.get()
			.map(|t| {
				format!(
					"position: absolute; left: {:.0}px; top: {:.0}px; pointer-events: none;",
					t.x, t.y
				)
			})
			.unwrap_or_else(|| "display: none;".to_string())
	};

	view! {
		<div class="force-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-toolbar">
				<button title="Zoom in" on:click=control(&state, &sync, ForceGraphState::zoom_in)>"+"</button>
				<button title="Zoom out" on:click=control(&state, &sync, ForceGraphState::zoom_out)>"−"</button>
				<button title="Reset view" on:click=control(&state, &sync, ForceGraphState::reset_view)>"Fit"</button>
				<button
					title="Play/pause simulation"
					on:click=control(&state, &sync, |s| {
						s.toggle_simulation();
					})
				>
					{move || if running.get() { "Pause" } else { "Play" }}
				</button>
				<button title="Re-randomize layout" on:click=control(&state, &sync, ForceGraphState::reset)>"Reset"</button>
				<button
					title="Export as SVG"
					on:click=control(&state, &sync, |s| {
						let _ = s.export();
					})
				>
					"Export"
				</button>
				<input type="search" class="graph-search" placeholder="Search labels" on:input=on_search />
				<span class="graph-search-count">
					{move || matches.get().map(|n| format!("{n} match(es)"))}
				</span>
			</div>
			<div class="graph-tooltip" style=tooltip_style>
				{move || {
					tooltip
						.get()
						.map(|t| {
							view! {
								<strong>{t.label}</strong>
								<span class="tooltip-type">{t.entity_type}</span>
								<span class="tooltip-degree">{t.degree}</span>
							}
						})
				}}
			</div>
		</div>
	}
}

/// Click handler running `action` on the state, then syncing the view.
fn control<A>(state: &Rc<RefCell<ForceGraphState>>, sync: &Rc<dyn Fn()>, action: A) -> impl Fn(MouseEvent) + 'static + use<A>
where
	A: Fn(&mut ForceGraphState) + 'static,
{
	let (state, sync) = (Rc::clone(state), Rc::clone(sync));
	move |_| {
		action(&mut state.borrow_mut());
		sync();
	}
}

/// Pointer position relative to the canvas.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Size the canvas backing store and report the drawing bounds.
fn measure(canvas: &HtmlCanvasElement, fullscreen: bool, width: Option<f64>, height: Option<f64>) -> Bounds {
	let (w, h) = if fullscreen {
		web_sys::window()
			.as_ref()
			.and_then(window_size)
			.unwrap_or(FALLBACK_SIZE)
	} else {
		let parent = canvas.parent_element();
		(
			width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.filter(|w| *w > 0.0)
					.unwrap_or(FALLBACK_SIZE.0)
			}),
			height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.filter(|h| *h > 0.0)
					.unwrap_or(FALLBACK_SIZE.1)
			}),
		)
	};
	if canvas.width() != w as u32 {
		canvas.set_width(w as u32);
	}
	if canvas.height() != h as u32 {
		canvas.set_height(h as u32);
	}
	Bounds::new(w, h)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn control_handler_owns_its_handles() {
		let handler = {
			let state = Rc::new(RefCell::new(ForceGraphState::new(
				GraphConfig::default(),
				Bounds::new(100.0, 100.0),
			)));
			let sync: Rc<dyn Fn()> = Rc::new(|| {});
			let handler = control(&state, &sync, ForceGraphState::zoom_in);
			assert_eq!(Rc::strong_count(&state), 2);
			assert_eq!(Rc::strong_count(&sync), 2);
			handler
		};
		let boxed: Box<dyn Fn(MouseEvent)> = Box::new(handler);
		drop(boxed);
	}
}
