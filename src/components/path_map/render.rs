use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::projection::{Frame, ScreenNode, ScreenSegment};

pub const NODE_RADIUS: f64 = 6.0;

const BACKGROUND: &str = "#1a1a2e";
const NODE_COLOR: &str = "#64b4ff";
const ROOT_COLOR: &str = "#2ca02c";
const PING_COLOR: &str = "#ff7f0e";
const LAST_RING: &str = "rgba(255, 255, 255, 0.6)";
const SELECTED_RING: &str = "#e377c2";
const SEGMENT_COLOR: &str = "rgba(100, 180, 255, 0.7)";
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.8)";

/// Paints a projected frame. Frame y runs up from the bottom edge, the canvas
/// runs down from the top, so every y is flipped here.
pub fn render(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let (width, height) = (frame.viewport.width, frame.viewport.height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	for segment in &frame.segments {
		draw_segment(segment, height, ctx);
	}
	for node in &frame.nodes {
		draw_node(node, height, ctx);
	}
}

fn draw_segment(segment: &ScreenSegment<'_>, height: f64, ctx: &CanvasRenderingContext2d) {
	if segment.length < 0.001 {
		return;
	}
	ctx.save();
	let _ = ctx.translate(segment.x, height - segment.y);
	let _ = ctx.rotate(segment.rotation);

	ctx.set_stroke_style_str(SEGMENT_COLOR);
	ctx.set_line_width(2.0);
	ctx.begin_path();
	ctx.move_to(0.0, 0.0);
	ctx.line_to(segment.length, 0.0);
	ctx.stroke();

	if !segment.description.is_empty() {
		// keep the label upright on leftward segments
		let flipped = segment.rotation.abs() > PI / 2.0;
		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font("11px sans-serif");
		ctx.set_text_align("center");
		if flipped {
			let _ = ctx.rotate(PI);
			let _ = ctx.fill_text(segment.description, -segment.length / 2.0, -4.0);
		} else {
			let _ = ctx.fill_text(segment.description, segment.length / 2.0, -4.0);
		}
	}
	ctx.restore();
}

fn draw_node(node: &ScreenNode, height: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.x, height - node.y);
	let tags = node.tags;

	let fill = if tags.ping {
		PING_COLOR
	} else if tags.root {
		ROOT_COLOR
	} else {
		NODE_COLOR
	};
	let radius = if tags.ping { NODE_RADIUS * 0.8 } else { NODE_RADIUS };

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();

	if tags.last {
		ring(ctx, x, y, radius + 3.0, LAST_RING, 1.5);
	}
	if tags.selected {
		ring(ctx, x, y, radius + 6.0, SELECTED_RING, 2.0);
	}
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.stroke();
}
