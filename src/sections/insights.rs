use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::layout::{Cursor, PageFlow};
use crate::model::InsightSnapshot;

use super::{
    SECTION_TITLE_HEIGHT, Section, TextBlock, draw_section_title, draw_text_block, line_height,
};

/// Items shown per list, however many the insight carries.
pub const MAX_ITEMS: usize = 3;

const SUMMARY_HEADER_HEIGHT: f32 = 35.0;
const SUMMARY_MIN_HEIGHT: f32 = 70.0;
const SUMMARY_PADDING: f32 = 12.0;
const SUMMARY_GAP: f32 = 20.0;

const LIST_HEADER_HEIGHT: f32 = 28.0;
const LIST_HEADER_BLOCK: f32 = 35.0;
const BULLET_GAP: f32 = 8.0;
const LIST_GAP: f32 = 10.0;
const BULLET_RADIUS: f32 = 3.0;
const BULLET_TEXT_INDENT: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightList {
    Highlights,
    Recommendations,
    Challenges,
}

impl InsightList {
    pub const ORDER: [InsightList; 3] = [
        InsightList::Highlights,
        InsightList::Recommendations,
        InsightList::Challenges,
    ];

    pub fn title(self) -> &'static str {
        match self {
            InsightList::Highlights => "Highlights",
            InsightList::Recommendations => "Recommendations",
            InsightList::Challenges => "Challenges",
        }
    }

    pub fn items(self, insight: &InsightSnapshot) -> &[String] {
        match self {
            InsightList::Highlights => &insight.highlights,
            InsightList::Recommendations => &insight.recommendations,
            InsightList::Challenges => &insight.blockers,
        }
    }

    /// (accent, band fill, title color)
    fn palette(self) -> (Rgb, Rgb, Rgb) {
        match self {
            InsightList::Highlights => (Rgb::hex(0x10B981), Rgb::hex(0xECFDF5), Rgb::hex(0x065F46)),
            InsightList::Recommendations => {
                (Rgb::hex(0xF59E0B), Rgb::hex(0xFFFBEB), Rgb::hex(0x92400E))
            }
            InsightList::Challenges => (Rgb::hex(0xEF4444), Rgb::hex(0xFEF2F2), Rgb::hex(0x991B1B)),
        }
    }
}

/// Non-blank items of a list, capped at [`MAX_ITEMS`].
pub fn visible_items(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_ITEMS)
        .collect()
}

pub fn motivation_label(level: u8) -> String {
    format!("Motivation {}/100", level.min(100))
}

pub fn render<C: Canvas>(
    cursor: Cursor,
    flow: &mut PageFlow<'_, C>,
    insight: &InsightSnapshot,
) -> Cursor {
    let g = *flow.geometry();
    let width = g.content_width();
    let text_w = width - 2.0 * 15.0;

    let summary_style = TextStyle::new(10.0).color(Rgb::hex(0x1E40AF));
    let summary_h = flow
        .canvas()
        .measure_text(&insight.summary, Some(text_w), &summary_style);
    let body_h = (summary_h + 2.0 * SUMMARY_PADDING).max(SUMMARY_MIN_HEIGHT);
    let head_h = SECTION_TITLE_HEIGHT + SUMMARY_HEADER_HEIGHT;
    // A summary that cannot sit under its heading on one page keeps only its
    // first line there and continues on the pages after.
    let split = head_h + body_h > g.page_room();
    let lead = if split {
        line_height(flow, &summary_style) + 2.0 * SUMMARY_PADDING
    } else {
        body_h
    };

    let c = flow.reserve(cursor, head_h + lead);
    let c = draw_section_title(flow, c, Section::Insights.title());

    let canvas = flow.canvas();
    canvas.draw_rounded_rect(
        Bounds::new(g.margin, c.y, width, SUMMARY_HEADER_HEIGHT),
        8.0,
        &Paint::fill(Rgb::hex(0x6366F1)),
    );
    canvas.draw_text(
        "Key Summary",
        g.margin + 15.0,
        c.y + 11.0,
        None,
        &TextStyle::new(11.0).bold().color(Rgb::WHITE),
    );
    canvas.draw_text(
        &motivation_label(insight.motivation_level),
        g.margin + width - 15.0 - 150.0,
        c.y + 12.0,
        Some(150.0),
        &TextStyle::new(9.0)
            .color(Rgb::hex(0xE0E7FF))
            .align(Alignment::Right),
    );
    let c = c.advance(SUMMARY_HEADER_HEIGHT);

    let block = TextBlock::new(g.margin + 15.0, text_w)
        .padding(SUMMARY_PADDING)
        .min_height(SUMMARY_MIN_HEIGHT)
        .split_to_fit(split);
    let body = Paint::fill_and_stroke(Rgb::hex(0xEFF6FF), Rgb::hex(0xBFDBFE));
    let c = draw_text_block(
        flow,
        c,
        &insight.summary,
        &summary_style,
        block,
        |canvas, top, h, _| canvas.draw_rect(Bounds::new(g.margin, top.y, width, h), &body),
    );
    let mut c = c.advance(SUMMARY_GAP);

    for list in InsightList::ORDER {
        c = render_list(flow, c, list, list.items(insight));
    }
    c
}

fn render_list<C: Canvas>(
    flow: &mut PageFlow<'_, C>,
    cursor: Cursor,
    list: InsightList,
    items: &[String],
) -> Cursor {
    let items = visible_items(items);
    let Some(first_item) = items.first() else {
        return cursor;
    };
    let g = *flow.geometry();
    let width = g.content_width();
    let bullet_w = width - BULLET_TEXT_INDENT - 10.0;
    let (accent, fill, title_color) = list.palette();
    let text_style = TextStyle::new(9.0).color(Rgb::hex(0x1F2937));

    // Never leave a list header alone at the foot of a page. A first bullet
    // too tall to join it keeps only its first line there.
    let first_h = flow.canvas().measure_text(first_item, Some(bullet_w), &text_style);
    let split_first = LIST_HEADER_BLOCK + first_h + BULLET_GAP > g.page_room();
    let lead = if split_first {
        line_height(flow, &text_style)
    } else {
        first_h + BULLET_GAP
    };
    let c = flow.reserve(cursor, LIST_HEADER_BLOCK + lead);
    let canvas = flow.canvas();
    canvas.draw_rounded_rect(
        Bounds::new(g.margin, c.y, width, LIST_HEADER_HEIGHT),
        6.0,
        &Paint::fill_and_stroke(fill, accent),
    );
    canvas.draw_text(
        list.title(),
        g.margin + 12.0,
        c.y + 8.0,
        None,
        &TextStyle::new(11.0).bold().color(title_color),
    );
    let mut c = c.advance(LIST_HEADER_BLOCK);

    let dot = Paint::fill(accent);
    for (i, item) in items.iter().enumerate() {
        let block = TextBlock::new(g.margin + BULLET_TEXT_INDENT, bullet_w)
            .split_to_fit(i == 0 && split_first);
        c = draw_text_block(flow, c, item, &text_style, block, |canvas, top, _, first| {
            if first {
                canvas.draw_circle(g.margin + 15.0, top.y + 5.0, BULLET_RADIUS, &dot);
            }
        });
        c = c.advance(BULLET_GAP);
    }

    c.advance(LIST_GAP)
}
