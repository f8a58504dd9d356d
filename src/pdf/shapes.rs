use pdf_writer::Content;

use crate::canvas::Paint;

/// Control-point distance for approximating a quarter circle with one cubic.
const KAPPA: f32 = 0.552_284_8;

/// Trace a rounded rectangle given its PDF-space corners (`y0` is the bottom edge).
pub(super) fn trace_rounded_rect(
    content: &mut Content,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    radius: f32,
) {
    let r = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
    let k = r * KAPPA;
    content.move_to(x0 + r, y0);
    content.line_to(x1 - r, y0);
    content.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    content.line_to(x1, y1 - r);
    content.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    content.line_to(x0 + r, y1);
    content.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    content.line_to(x0, y0 + r);
    content.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    content.close_path();
}

pub(super) fn trace_circle(content: &mut Content, cx: f32, cy: f32, r: f32) {
    let k = r * KAPPA;
    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
}

/// Set colors for `paint`. Must run before the path is traced.
pub(super) fn apply_paint(content: &mut Content, paint: &Paint) {
    if let Some(fill) = paint.fill {
        let (r, g, b) = fill.components();
        content.set_fill_rgb(r, g, b);
    }
    if let Some(stroke) = paint.stroke {
        let (r, g, b) = stroke.components();
        content.set_stroke_rgb(r, g, b);
        content.set_line_width(paint.line_width);
    }
}

/// Paint the current path.
pub(super) fn finish_path(content: &mut Content, paint: &Paint) {
    match (paint.fill, paint.stroke) {
        (Some(_), Some(_)) => content.fill_nonzero_and_stroke(),
        (Some(_), None) => content.fill_nonzero(),
        (None, Some(_)) => content.stroke(),
        (None, None) => content.end_path(),
    };
}
