use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::layout::{Cursor, PageFlow};
use crate::model::StatsSnapshot;

use super::{
    SECTION_TITLE_HEIGHT, Section, draw_section_title, format_completion_rate, format_hours,
    format_sentiment,
};

const COLUMNS: usize = 3;
const BOX_HEIGHT: f32 = 60.0;
const BOX_GAP: f32 = 10.0;
const SECTION_GAP: f32 = 25.0;

const LABEL: Rgb = Rgb::hex(0x374151);

/// One tile of the statistics grid.
#[derive(Clone, Debug, PartialEq)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
    pub accent: Rgb,
    pub fill: Rgb,
}

/// The six tiles, in reading order.
pub fn stat_tiles(stats: &StatsSnapshot) -> [StatTile; 6] {
    [
        StatTile {
            label: "Completed Days",
            value: stats.completed_days.to_string(),
            accent: Rgb::hex(0x10B981),
            fill: Rgb::hex(0xECFDF5),
        },
        StatTile {
            label: "Completion Rate",
            value: format_completion_rate(stats.completion_rate),
            accent: Rgb::hex(0x3B82F6),
            fill: Rgb::hex(0xEFF6FF),
        },
        StatTile {
            label: "Current Streak",
            value: stats.current_streak.to_string(),
            accent: Rgb::hex(0xF59E0B),
            fill: Rgb::hex(0xFFFBEB),
        },
        StatTile {
            label: "Total Days",
            value: stats.total_days.to_string(),
            accent: Rgb::hex(0x8B5CF6),
            fill: Rgb::hex(0xF5F3FF),
        },
        StatTile {
            label: "Hours Spent",
            value: format_hours(stats.total_hours_spent),
            accent: Rgb::hex(0xEF4444),
            fill: Rgb::hex(0xFEF2F2),
        },
        StatTile {
            label: "Avg. Sentiment",
            value: format_sentiment(stats.average_sentiment),
            accent: Rgb::hex(0x06B6D4),
            fill: Rgb::hex(0xECFEFF),
        },
    ]
}

pub fn render<C: Canvas>(
    cursor: Cursor,
    flow: &mut PageFlow<'_, C>,
    stats: &StatsSnapshot,
) -> Cursor {
    let g = *flow.geometry();
    let tile_w = (g.content_width() - BOX_GAP * (COLUMNS - 1) as f32) / COLUMNS as f32;
    let value_style = TextStyle::new(22.0).bold().align(Alignment::Center);
    let label_style = TextStyle::new(9.0).color(LABEL).align(Alignment::Center);

    let c = flow.reserve(cursor, SECTION_TITLE_HEIGHT + BOX_HEIGHT);
    let mut c = draw_section_title(flow, c, Section::Statistics.title());

    let tiles = stat_tiles(stats);
    for (row_index, row) in tiles.chunks(COLUMNS).enumerate() {
        // A row of tiles is one block; the gap above it is dropped on a new page.
        let row_top = if row_index == 0 {
            c
        } else {
            flow.reserve(c.advance(BOX_GAP), BOX_HEIGHT)
        };
        let canvas = flow.canvas();
        for (col, tile) in row.iter().enumerate() {
            let x = g.margin + col as f32 * (tile_w + BOX_GAP);
            canvas.draw_rounded_rect(
                Bounds::new(x, row_top.y, tile_w, BOX_HEIGHT),
                8.0,
                &Paint::fill_and_stroke(tile.fill, tile.accent),
            );
            canvas.draw_text(
                &tile.value,
                x,
                row_top.y + 15.0,
                Some(tile_w),
                &value_style.color(tile.accent),
            );
            canvas.draw_text(tile.label, x, row_top.y + 42.0, Some(tile_w), &label_style);
        }
        c = row_top.advance(BOX_HEIGHT);
    }

    c.advance(SECTION_GAP)
}
