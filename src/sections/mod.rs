//! The four report sections.
//!
//! Each renderer takes the cursor where it may start, draws its blocks through
//! [`PageFlow::reserve`] and returns the cursor below its content. Renderers
//! share nothing but the flow they are handed.

pub mod insights;
pub mod overview;
pub mod statistics;
pub mod table;

use crate::canvas::{Canvas, Rgb, TextStyle};
use crate::layout::{Cursor, PageFlow};
use crate::model::ReportData;

/// Rule + heading that opens a section.
pub const SECTION_TITLE_HEIGHT: f32 = 33.0;

const TITLE_RULE: Rgb = Rgb::hex(0xE0E7FF);
const TITLE_TEXT: Rgb = Rgb::hex(0x4338CA);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Overview,
    Statistics,
    ProgressTable,
    Insights,
}

impl Section {
    /// The order sections appear in a report.
    pub const ORDER: [Section; 4] = [
        Section::Overview,
        Section::Statistics,
        Section::ProgressTable,
        Section::Insights,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Goal Overview",
            Section::Statistics => "Progress Statistics",
            Section::ProgressTable => "Daily Progress Summary",
            Section::Insights => "AI-Generated Insights",
        }
    }

    /// Whether `data` has anything for this section to show.
    pub fn has_content(self, data: &ReportData) -> bool {
        match self {
            Section::Insights => data.latest_insight().is_some(),
            _ => true,
        }
    }

    pub fn render<C: Canvas>(
        self,
        cursor: Cursor,
        flow: &mut PageFlow<'_, C>,
        data: &ReportData,
    ) -> Cursor {
        match self {
            Section::Overview => overview::render(cursor, flow, &data.goal),
            Section::Statistics => statistics::render(cursor, flow, &data.stats),
            Section::ProgressTable => table::render(cursor, flow, &data.progress),
            Section::Insights => match data.latest_insight() {
                Some(insight) => insights::render(cursor, flow, insight),
                None => cursor,
            },
        }
    }
}

/// Draw a section heading at `cursor`. The caller has already reserved
/// [`SECTION_TITLE_HEIGHT`] together with the block that follows it.
pub(crate) fn draw_section_title<C: Canvas>(
    flow: &mut PageFlow<'_, C>,
    cursor: Cursor,
    title: &str,
) -> Cursor {
    let margin = flow.geometry().margin;
    let canvas = flow.canvas();
    canvas.draw_line((margin, cursor.y), (margin + 50.0, cursor.y), TITLE_RULE, 2.0);
    canvas.draw_text(
        title,
        margin,
        cursor.y + 8.0,
        None,
        &TextStyle::new(14.0).bold().color(TITLE_TEXT),
    );
    cursor.advance(SECTION_TITLE_HEIGHT)
}

/// Where a wrapped text block goes and how much frame surrounds it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextBlock {
    pub x: f32,
    pub width: f32,
    /// Space above and below the text inside the block.
    pub padding: f32,
    pub min_height: f32,
    /// Split rather than move to a new page when the block does not fit
    /// below the cursor.
    pub split_to_fit: bool,
}

impl TextBlock {
    pub fn new(x: f32, width: f32) -> Self {
        TextBlock {
            x,
            width,
            padding: 0.0,
            min_height: 0.0,
            split_to_fit: false,
        }
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn min_height(mut self, min_height: f32) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn split_to_fit(mut self, split: bool) -> Self {
        self.split_to_fit = split;
        self
    }
}

/// Draw `text` wrapped to `block.width`. Text that fits on one page is a
/// single block; longer text (or any text that misses the current page when
/// `split_to_fit` is set) is cut into runs of whole lines, each
/// filling what is left of its page.
///
/// `frame` runs before each run's text with the run's top, its height
/// (padding included) and whether it is the first run.
pub(crate) fn draw_text_block<C: Canvas>(
    flow: &mut PageFlow<'_, C>,
    cursor: Cursor,
    text: &str,
    style: &TextStyle,
    block: TextBlock,
    mut frame: impl FnMut(&mut C, Cursor, f32, bool),
) -> Cursor {
    let pad = 2.0 * block.padding;
    let limit = flow.geometry().content_limit();
    let height = flow.canvas().measure_text(text, Some(block.width), style);
    let whole = (height + pad).max(block.min_height);
    let fits_here = flow.geometry().fits(cursor.y, whole);
    if fits_here || (!block.split_to_fit && whole <= flow.geometry().page_room()) {
        let c = flow.reserve(cursor, whole);
        let canvas = flow.canvas();
        frame(canvas, c, whole, true);
        canvas.draw_text(text, block.x, c.y + block.padding, Some(block.width), style);
        return c.advance(whole);
    }

    let lines = flow.canvas().wrap_text(text, Some(block.width), style);
    let line_h = line_height(flow, style);
    log::debug!(
        "splitting {:.1}pt of text ({} lines) across pages",
        height,
        lines.len()
    );
    let mut rest = lines.as_slice();
    let mut c = cursor;
    let mut first = true;
    while !rest.is_empty() {
        c = flow.reserve(c, line_h + pad);
        let room = limit - c.y - pad;
        let n = ((room / line_h).floor() as usize).clamp(1, rest.len());
        let (run, tail) = rest.split_at(n);
        let run_h = n as f32 * line_h + pad;
        let canvas = flow.canvas();
        frame(canvas, c, run_h, first);
        canvas.draw_text(
            &run.join("\n"),
            block.x,
            c.y + block.padding,
            Some(block.width),
            style,
        );
        c = c.advance(run_h);
        rest = tail;
        first = false;
    }
    c
}

/// Line height of `style`, for reserving the first line of a block.
pub(crate) fn line_height<C: Canvas>(flow: &mut PageFlow<'_, C>, style: &TextStyle) -> f32 {
    flow.canvas().measure_text("M", None, style)
}

/// Numbers the way the report prints them: whole values without decimals,
/// others with at most two.
pub fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn format_completion_rate(rate: f64) -> String {
    format!("{}%", rate.round() as i64)
}

/// Average sentiment as a whole percentage, with `+` only for positive values.
pub fn format_sentiment(score: f64) -> String {
    let pct = (score * 100.0).round() as i64;
    if pct > 0 {
        format!("+{pct}")
    } else {
        format!("{pct}")
    }
}

pub fn format_hours(hours: f64) -> String {
    format!("{}h", format_number(hours))
}
