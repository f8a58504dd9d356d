use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::layout::{Cursor, PageFlow};
use crate::model::ProgressEntry;

use super::{SECTION_TITLE_HEIGHT, Section, draw_section_title, format_hours};

/// Only the most recent completed days are listed.
pub const MAX_ROWS: usize = 10;
pub const PREVIEW_CHARS: usize = 35;
pub const NO_COMMENT: &str = "No comment";

const HEADER_HEIGHT: f32 = 30.0;
const ROW_HEIGHT: f32 = 25.0;
const ROW_PITCH: f32 = 28.0;
const SECTION_GAP: f32 = 15.0;

/// Header labels and their offsets from the left margin.
const COLUMNS: [(&str, f32); 4] = [
    ("Day", 10.0),
    ("Status", 60.0),
    ("Hours", 120.0),
    ("Comment", 180.0),
];

const DAY_BADGE_X: f32 = 8.0;
const STATUS_X: f32 = 60.0;
const HOURS_X: f32 = 125.0;
const COMMENT_X: f32 = 185.0;

const HEADER_FILL: Rgb = Rgb::hex(0x4F46E5);
const ROW_FILL: [Rgb; 2] = [Rgb::hex(0xF8FAFC), Rgb::WHITE];
const ROW_BORDER: Rgb = Rgb::hex(0xE2E8F0);
const DONE: Rgb = Rgb::hex(0x10B981);

/// The last [`MAX_ROWS`] completed entries of an ascending progress list,
/// still ascending.
pub fn recent_completed(progress: &[ProgressEntry]) -> Vec<&ProgressEntry> {
    let done: Vec<&ProgressEntry> = progress.iter().filter(|p| p.completed).collect();
    let skip = done.len().saturating_sub(MAX_ROWS);
    done.into_iter().skip(skip).collect()
}

/// Comment shortened to fit its column: longer than [`PREVIEW_CHARS`] becomes
/// the first 32 characters plus `...`.
pub fn comment_preview(comment: &str) -> String {
    if comment.chars().count() > PREVIEW_CHARS {
        let mut s: String = comment.chars().take(PREVIEW_CHARS - 3).collect();
        s.push_str("...");
        s
    } else {
        comment.to_string()
    }
}

/// Hours cell text, `-` when nothing was logged.
pub fn hours_cell(hours: Option<f64>) -> String {
    hours.map_or_else(|| "-".to_string(), format_hours)
}

fn draw_header_row<C: Canvas>(flow: &mut PageFlow<'_, C>, cursor: Cursor) -> Cursor {
    let g = *flow.geometry();
    let canvas = flow.canvas();
    canvas.draw_rounded_rect(
        Bounds::new(g.margin, cursor.y, g.content_width(), HEADER_HEIGHT),
        6.0,
        &Paint::fill(HEADER_FILL),
    );
    let style = TextStyle::new(10.0).bold().color(Rgb::WHITE);
    for (label, dx) in COLUMNS {
        canvas.draw_text(label, g.margin + dx, cursor.y + 10.0, None, &style);
    }
    cursor.advance(HEADER_HEIGHT)
}

fn draw_row<C: Canvas>(
    flow: &mut PageFlow<'_, C>,
    cursor: Cursor,
    index: usize,
    entry: &ProgressEntry,
) {
    let g = *flow.geometry();
    let x = g.margin;
    let y = cursor.y;
    let canvas = flow.canvas();

    canvas.draw_rounded_rect(
        Bounds::new(x, y, g.content_width(), ROW_HEIGHT),
        4.0,
        &Paint::fill_and_stroke(ROW_FILL[index % 2], ROW_BORDER),
    );

    canvas.draw_rounded_rect(
        Bounds::new(x + DAY_BADGE_X, y + 6.0, 30.0, 14.0),
        7.0,
        &Paint::fill_and_stroke(Rgb::hex(0xE0E7FF), Rgb::hex(0x6366F1)),
    );
    canvas.draw_text(
        &entry.day.to_string(),
        x + DAY_BADGE_X,
        y + 7.0,
        Some(30.0),
        &TextStyle::new(9.0)
            .bold()
            .color(Rgb::hex(0x4338CA))
            .align(Alignment::Center),
    );

    canvas.draw_text(
        "Done",
        x + STATUS_X,
        y + 8.0,
        None,
        &TextStyle::new(10.0).bold().color(DONE),
    );
    canvas.draw_text(
        &hours_cell(entry.hours_spent),
        x + HOURS_X,
        y + 8.0,
        None,
        &TextStyle::new(9.0).color(Rgb::hex(0x374151)),
    );

    // Previews stay on one line so the row height never changes.
    match entry.comment.as_deref().filter(|c| !c.is_empty()) {
        Some(comment) => {
            let preview = comment_preview(comment).replace(['\r', '\n'], " ");
            canvas.draw_text(
                &preview,
                x + COMMENT_X,
                y + 8.0,
                None,
                &TextStyle::new(8.0).color(Rgb::hex(0x4B5563)),
            );
        }
        None => {
            canvas.draw_text(
                NO_COMMENT,
                x + COMMENT_X,
                y + 8.0,
                None,
                &TextStyle::new(8.0).italic().color(Rgb::hex(0x9CA3AF)),
            );
        }
    }
}

pub fn render<C: Canvas>(
    cursor: Cursor,
    flow: &mut PageFlow<'_, C>,
    progress: &[ProgressEntry],
) -> Cursor {
    let rows = recent_completed(progress);
    let first_row = if rows.is_empty() { 0.0 } else { ROW_PITCH };

    // Heading, column header and first row travel together.
    let c = flow.reserve(cursor, SECTION_TITLE_HEIGHT + HEADER_HEIGHT + first_row);
    let c = draw_section_title(flow, c, Section::ProgressTable.title());
    let mut c = draw_header_row(flow, c);

    for (i, entry) in rows.iter().enumerate() {
        let row_top = flow.reserve(c, ROW_PITCH);
        let row_top = if row_top.page != c.page {
            draw_header_row(flow, row_top)
        } else {
            row_top
        };
        log::debug!(
            "progress row {} day={} page={} y={:.1}",
            i,
            entry.day,
            row_top.page + 1,
            row_top.y
        );
        draw_row(flow, row_top, i, entry);
        c = row_top.advance(ROW_PITCH);
    }

    c.advance(SECTION_GAP)
}
