//! Canvas rendering for the force graph.
//!
//! Paints a [`Scene`] in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, nodes, selection ring, labels (world space)
//! 3. Vignette (screen space)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeShape, LabelShape, NodeShape, RingShape, Scene};
use super::theme::Theme;

/// Renders the complete scene to the canvas.
pub fn draw(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let t = scene.frame.transform;

	draw_background(scene, ctx, theme);

	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	for edge in &scene.edges {
		draw_edge(ctx, edge);
	}
	for node in &scene.nodes {
		draw_node(ctx, node, theme);
	}
	if let Some(ring) = &scene.ring {
		draw_ring(ctx, ring);
	}
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for label in &scene.labels {
		draw_label(ctx, label, scene.font_family);
	}

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(scene, ctx, theme);
	}
}

fn draw_background(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (scene.frame.bounds.width, scene.frame.bounds.height);
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &scene.background.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&scene.background.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (scene.frame.bounds.width, scene.frame.bounds.height);
	let Ok(gradient) = ctx.create_radial_gradient(w / 2.0, h / 2.0, w.min(h) * 0.3, w / 2.0, h / 2.0, w.max(h) * 0.7)
	else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", theme.background.vignette));

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &EdgeShape) {
	if edge.from.distance(edge.to) < 0.001 {
		return;
	}
	ctx.set_stroke_style_str(&edge.color.to_css());
	ctx.set_line_width(edge.width);
	ctx.set_line_cap("round");
	ctx.begin_path();
	ctx.move_to(edge.from.x, edge.from.y);
	ctx.line_to(edge.to.x, edge.to.y);
	ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeShape, theme: &Theme) {
	let (x, y, radius) = (node.center.x, node.center.y, node.radius);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let base = node.fill;
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).with_alpha(base.a).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).with_alpha(base.a).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.fill.to_css()),
	}
	ctx.fill();

	if node.stroke_width > 0.0 {
		ctx.set_stroke_style_str(&node.stroke.to_css());
		ctx.set_line_width(node.stroke_width);
		ctx.stroke();
	}
}

fn draw_ring(ctx: &CanvasRenderingContext2d, ring: &RingShape) {
	ctx.begin_path();
	let _ = ctx.arc(ring.center.x, ring.center.y, ring.radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&ring.color.to_css());
	ctx.set_line_width(ring.width);
	ctx.stroke();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &LabelShape, font_family: &str) {
	ctx.set_font(&format!("{:.2}px {}", label.font_size, font_family));
	ctx.set_fill_style_str(&label.color.to_css());
	let _ = ctx.fill_text(&label.text, label.position.x, label.position.y);
}
