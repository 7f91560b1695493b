use web_sys::CanvasRenderingContext2d;

use super::state::{
	COPY_SIZE, EditorState, Gesture, HANDLE_RADIUS, NODE_HEIGHT, NODE_WIDTH,
};
use super::store::GraphDocument;

const ARROW_SIZE: f64 = 9.0;

/// One straight segment per edge whose endpoints both resolve to a live
/// node, from source center to target center. Edges with a dangling
/// reference are skipped. Pure function of the document, recomputed in
/// full on every redraw.
pub fn edge_segments(doc: &GraphDocument) -> Vec<((f64, f64), (f64, f64))> {
	doc.edges()
		.iter()
		.filter_map(|edge| {
			let from = doc.node(&edge.from)?;
			let to = doc.node(&edge.to)?;
			Some((EditorState::node_center(from), EditorState::node_center(to)))
		})
		.collect()
}

/// Distance from a node's center to its rectangle border along the unit
/// direction `(ux, uy)`. Used to pull arrowheads back out from under the
/// target node.
fn rect_border_offset(ux: f64, uy: f64) -> f64 {
	let (hw, hh) = (NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0);
	let tx = if ux.abs() < 1e-9 { f64::MAX } else { hw / ux.abs() };
	let ty = if uy.abs() < 1e-9 { f64::MAX } else { hh / uy.abs() };
	tx.min(ty)
}

/// Full redraw: clear, apply the viewport transform, then edges, the
/// transient connect line if one is live, and nodes on top.
pub fn render(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f4f4f7");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_pending_connection(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, ux: f64, uy: f64) {
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edges(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str("#222");
	ctx.set_fill_style_str("#222");
	ctx.set_line_width(1.5);

	for ((x1, y1), (x2, y2)) in edge_segments(&state.doc) {
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		// Arrowhead at the border of the target box, not buried under it.
		let offset = rect_border_offset(ux, uy).min(dist);
		draw_arrow(ctx, x2 - ux * offset, y2 - uy * offset, ux, uy);
	}
}

fn draw_pending_connection(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	let Gesture::Connect {
		from,
		cursor_x,
		cursor_y,
	} = &state.gesture
	else {
		return;
	};
	let Some(source) = state.doc.node(from) else {
		return;
	};
	let (x1, y1) = EditorState::node_center(source);
	let (dx, dy) = (cursor_x - x1, cursor_y - y1);
	let dist = (dx * dx + dy * dy).sqrt();

	ctx.set_stroke_style_str("#222");
	ctx.set_fill_style_str("#222");
	ctx.set_line_width(1.5);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(*cursor_x, *cursor_y);
	ctx.stroke();
	if dist > 0.001 {
		draw_arrow(ctx, *cursor_x, *cursor_y, dx / dist, dy / dist);
	}
}

fn draw_nodes(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	for node in state.doc.nodes() {
		ctx.set_fill_style_str("#ffffff");
		ctx.fill_rect(node.x, node.y, NODE_WIDTH, NODE_HEIGHT);
		ctx.set_stroke_style_str("#444");
		ctx.set_line_width(1.0);
		ctx.stroke_rect(node.x, node.y, NODE_WIDTH, NODE_HEIGHT);

		ctx.set_fill_style_str("#1a1a1a");
		ctx.set_font("13px sans-serif");
		let _ = ctx.fill_text(&node.title, node.x + 8.0, node.y + 20.0);

		// copy affordance, flipped while this node's copy just succeeded
		let glyph = if state.copied.as_deref() == Some(node.id.as_str()) {
			"\u{2705}"
		} else {
			"\u{1F4CB}"
		};
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(
			glyph,
			node.x + NODE_WIDTH - COPY_SIZE - 4.0,
			node.y + 4.0 + 12.0,
		);

		// connection handle on the right edge
		ctx.begin_path();
		let _ = ctx.arc(
			node.x + NODE_WIDTH,
			node.y + NODE_HEIGHT / 2.0,
			HANDLE_RADIUS,
			0.0,
			std::f64::consts::TAU,
		);
		ctx.set_fill_style_str("#4a90d9");
		ctx.fill();
	}
}
