use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::layout::{Cursor, PageFlow};
use crate::model::{GoalSnapshot, GoalStatus};

use super::{
    SECTION_TITLE_HEIGHT, Section, TextBlock, draw_section_title, draw_text_block, format_number,
};

const TITLE_BOX_MIN_HEIGHT: f32 = 40.0;
const TITLE_BOX_PADDING: f32 = 12.0;
const TITLE_BOX_GAP: f32 = 15.0;
const DESCRIPTION_GAP: f32 = 10.0;

const CARD_COUNT: usize = 3;
const CARD_HEIGHT: f32 = 65.0;
const CARD_GAP: f32 = 15.0;
const CARD_ROW_LEAD: f32 = 5.0;
const CARD_ROW_GAP: f32 = 15.0;

const BADGE_WIDTH: f32 = 180.0;
const BADGE_HEIGHT: f32 = 30.0;
const BADGE_BLOCK: f32 = 45.0;

struct DetailCard {
    label: &'static str,
    value: String,
    fill: Rgb,
    border: Rgb,
}

fn detail_cards(goal: &GoalSnapshot) -> [DetailCard; CARD_COUNT] {
    [
        DetailCard {
            label: "Duration",
            value: format!("{} days", goal.duration),
            fill: Rgb::hex(0xFEF3C7),
            border: Rgb::hex(0xF59E0B),
        },
        DetailCard {
            label: "Hours/Day",
            value: format!("{} hours", format_number(goal.hours_per_day)),
            fill: Rgb::hex(0xDBEAFE),
            border: Rgb::hex(0x3B82F6),
        },
        DetailCard {
            label: "Start Date",
            value: goal.start_date.format("%-m/%-d/%Y").to_string(),
            fill: Rgb::hex(0xE0E7FF),
            border: Rgb::hex(0x6366F1),
        },
    ]
}

/// Width of each of `n` side-by-side cards separated by `gap`.
pub fn card_width(content_width: f32, n: usize, gap: f32) -> f32 {
    (content_width - gap * n.saturating_sub(1) as f32) / n as f32
}

pub fn status_label(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "IN PROGRESS",
        GoalStatus::Completed => "COMPLETED",
        GoalStatus::Abandoned => "ABANDONED",
    }
}

pub fn render<C: Canvas>(
    cursor: Cursor,
    flow: &mut PageFlow<'_, C>,
    goal: &GoalSnapshot,
) -> Cursor {
    let g = *flow.geometry();
    let width = g.content_width();

    let title_style = TextStyle::new(16.0).bold().color(Rgb::hex(0x0C4A6E));
    let title_w = width - 2.0 * 15.0;
    let title_h = flow.canvas().measure_text(&goal.title, Some(title_w), &title_style);
    let box_h = (title_h + 2.0 * TITLE_BOX_PADDING).max(TITLE_BOX_MIN_HEIGHT);

    let c = flow.reserve(cursor, SECTION_TITLE_HEIGHT + box_h + TITLE_BOX_GAP);
    let c = draw_section_title(flow, c, Section::Overview.title());
    let canvas = flow.canvas();
    canvas.draw_rounded_rect(
        Bounds::new(g.margin, c.y, width, box_h),
        8.0,
        &Paint::fill_and_stroke(Rgb::hex(0xF0F9FF), Rgb::hex(0x0EA5E9)),
    );
    canvas.draw_text(
        &goal.title,
        g.margin + 15.0,
        c.y + TITLE_BOX_PADDING,
        Some(title_w),
        &title_style,
    );
    let mut c = c.advance(box_h + TITLE_BOX_GAP);

    if let Some(description) = goal.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let style = TextStyle::new(10.0).color(Rgb::hex(0x4B5563));
        let block = TextBlock::new(g.margin, width);
        c = draw_text_block(flow, c, description, &style, block, |_, _, _, _| {});
        c = c.advance(DESCRIPTION_GAP);
    }

    // The three cards sit side by side, so they move to a new page together.
    let c = flow.reserve(c.advance(CARD_ROW_LEAD), CARD_HEIGHT + CARD_ROW_GAP);
    let card_w = card_width(width, CARD_COUNT, CARD_GAP);
    let value_style = TextStyle::new(12.0)
        .bold()
        .color(Rgb::hex(0x1F2937))
        .align(Alignment::Center);
    let label_style = TextStyle::new(9.0)
        .color(Rgb::hex(0x6B7280))
        .align(Alignment::Center);
    let canvas = flow.canvas();
    for (i, card) in detail_cards(goal).iter().enumerate() {
        let x = g.margin + i as f32 * (card_w + CARD_GAP);
        canvas.draw_rounded_rect(
            Bounds::new(x, c.y, card_w, CARD_HEIGHT),
            6.0,
            &Paint::fill_and_stroke(card.fill, card.border),
        );
        canvas.draw_text(&card.value, x, c.y + 20.0, Some(card_w), &value_style);
        canvas.draw_text(card.label, x, c.y + 45.0, Some(card_w), &label_style);
    }
    let c = c.advance(CARD_HEIGHT + CARD_ROW_GAP);

    let c = flow.reserve(c, BADGE_BLOCK);
    let (accent, fill) = if goal.status == GoalStatus::Completed {
        (Rgb::hex(0x10B981), Rgb::hex(0xD1FAE5))
    } else {
        (Rgb::hex(0x3B82F6), Rgb::hex(0xDBEAFE))
    };
    let canvas = flow.canvas();
    canvas.draw_rounded_rect(
        Bounds::new(g.margin, c.y, BADGE_WIDTH, BADGE_HEIGHT),
        15.0,
        &Paint::fill_and_stroke(fill, accent),
    );
    canvas.draw_text(
        status_label(goal.status),
        g.margin,
        c.y + 9.0,
        Some(BADGE_WIDTH),
        &TextStyle::new(12.0).bold().color(accent).align(Alignment::Center),
    );
    c.advance(BADGE_BLOCK)
}
