//! Standalone SVG export of the current scene.

use log::info;

use super::error::ExportError;
use super::scene::Scene;
use super::theme::Color;

/// Filename offered to the host for downloads.
pub const SUGGESTED_FILENAME: &str = "knowledge-graph.svg";

/// MIME type of [`export_svg`] output.
pub const SVG_MIME: &str = "image/svg+xml";

/// Serialize `scene` into an SVG 1.1 document.
///
/// The document has the viewport's pixel size and one group carrying the
/// current pan/zoom, so the file looks exactly like the canvas did.
pub fn export_svg(scene: &Scene) -> Result<Vec<u8>, ExportError> {
	if scene.is_empty() {
		return Err(ExportError::EmptySurface);
	}
	let (width, height) = (scene.frame.bounds.width, scene.frame.bounds.height);
	let t = scene.frame.transform;
	let mut svg = String::new();

	svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
	svg.push_str(&format!(
		"<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">\n",
	));
	svg.push_str(&format!(
		"<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
		scene.background.to_hex()
	));
	svg.push_str(&format!(
		"<g transform=\"translate({:.2} {:.2}) scale({:.4})\">\n",
		t.x, t.y, t.k
	));

	svg.push_str("<g class=\"edges\">\n");
	for edge in &scene.edges {
		svg.push_str(&format!(
			"<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"{} stroke-width=\"{:.2}\" stroke-linecap=\"round\"><title>{}</title></line>\n",
			edge.from.x,
			edge.from.y,
			edge.to.x,
			edge.to.y,
			edge.color.to_hex(),
			opacity_attr("stroke-opacity", edge.color),
			edge.width,
			escape_xml(&edge.relation_type)
		));
	}
	svg.push_str("</g>\n");

	svg.push_str("<g class=\"nodes\">\n");
	for node in &scene.nodes {
		svg.push_str(&format!(
			"<circle id=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"{} stroke=\"{}\"{} stroke-width=\"{:.2}\"/>\n",
			escape_xml(&node.id),
			node.center.x,
			node.center.y,
			node.radius,
			node.fill.to_hex(),
			opacity_attr("fill-opacity", node.fill),
			node.stroke.to_hex(),
			opacity_attr("stroke-opacity", node.stroke),
			node.stroke_width
		));
	}
	if let Some(ring) = &scene.ring {
		svg.push_str(&format!(
			"<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"/>\n",
			ring.center.x,
			ring.center.y,
			ring.radius,
			ring.color.to_hex(),
			ring.width
		));
	}
	svg.push_str("</g>\n");

	svg.push_str("<g class=\"labels\">\n");
	for label in &scene.labels {
		svg.push_str(&format!(
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"hanging\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\"{}>{}</text>\n",
			label.position.x,
			label.position.y,
			escape_xml(scene.font_family),
			label.font_size,
			label.color.to_hex(),
			opacity_attr("fill-opacity", label.color),
			escape_xml(&label.text)
		));
	}
	svg.push_str("</g>\n");

	svg.push_str("</g>\n</svg>\n");
	info!(
		"export: {} nodes, {} edges, {} bytes",
		scene.nodes.len(),
		scene.edges.len(),
		svg.len()
	);
	Ok(svg.into_bytes())
}

fn opacity_attr(name: &str, color: Color) -> String {
	if (color.a - 1.0).abs() < 0.001 {
		String::new()
	} else {
		format!(" {name}=\"{:.3}\"", color.a)
	}
}

/// Escape markup and drop characters XML 1.0 does not allow.
fn escape_xml(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&apos;"),
			'\t' | '\n' | '\r' => out.push(c),
			'\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
			_ => out.push(c),
		}
	}
	out
}
