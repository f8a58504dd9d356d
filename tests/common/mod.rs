#![allow(dead_code)]

use chrono::NaiveDate;

use goal_report_pdf::canvas::{Bounds, Canvas, Paint, Rgb, TextStyle};
use goal_report_pdf::fonts::FontBook;
use goal_report_pdf::layout::FooterStamp;
use goal_report_pdf::{
    Error, GoalSnapshot, GoalStatus, InsightSnapshot, ProgressEntry, ReportAssembler,
    ReportConfig, ReportData, StatsSnapshot,
};

pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Default config with a pinned date and readable content streams.
pub fn fixed_config() -> ReportConfig {
    ReportConfig {
        generated_on: Some(fixed_date()),
        compress: false,
        ..ReportConfig::default()
    }
}

pub fn goal() -> GoalSnapshot {
    GoalSnapshot {
        id: Some("65f1c0ffee".into()),
        title: "Run a half marathon".into(),
        description: Some("Build up weekly mileage without getting injured.".into()),
        duration: 30,
        hours_per_day: 1.5,
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        status: GoalStatus::Active,
        plan_length: 30,
    }
}

/// Entries for days `1..=days`, each with a comment naming its day.
pub fn entries(days: u32, completed: impl Fn(u32) -> bool) -> Vec<ProgressEntry> {
    (1..=days)
        .map(|day| ProgressEntry {
            day,
            completed: completed(day),
            comment: Some(format!("note for day {day}")),
            hours_spent: Some(1.0),
            sentiment_score: Some(0.5),
        })
        .collect()
}

pub fn insight(items: usize) -> InsightSnapshot {
    let list = |kind: &str| (1..=items).map(|i| format!("{kind} {i}")).collect();
    InsightSnapshot {
        summary: "Steady progress with a strong finish to the week.".into(),
        highlights: list("highlight"),
        recommendations: list("recommendation"),
        blockers: list("blocker"),
        motivation_level: 72,
        mood_trend: Vec::new(),
    }
}

pub fn report(progress: Vec<ProgressEntry>, insights: Vec<InsightSnapshot>) -> ReportData {
    let goal = goal();
    let stats = StatsSnapshot::compute(&goal, &progress);
    ReportData {
        goal,
        progress,
        insights,
        stats,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Text { text: String, x: f32, y: f32, height: f32, style: TextStyle },
    Rect { bounds: Bounds },
    RoundedRect { bounds: Bounds },
    Circle { cx: f32, cy: f32, radius: f32 },
    Line { from: (f32, f32), to: (f32, f32) },
}

impl Op {
    pub fn top(&self) -> f32 {
        match self {
            Op::Text { y, .. } => *y,
            Op::Rect { bounds } | Op::RoundedRect { bounds } => bounds.y,
            Op::Circle { cy, radius, .. } => cy - radius,
            Op::Line { from, to } => from.1.min(to.1),
        }
    }

    pub fn bottom(&self) -> f32 {
        match self {
            Op::Text { y, height, .. } => y + height,
            Op::Rect { bounds } | Op::RoundedRect { bounds } => bounds.bottom(),
            Op::Circle { cy, radius, .. } => cy + radius,
            Op::Line { from, to } => from.1.max(to.1),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Op::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub page: usize,
    pub op: Op,
}

/// A canvas that remembers every call, measuring text with the same metrics as
/// the PDF canvas.
pub struct RecordingCanvas {
    fonts: FontBook,
    width: f32,
    height: f32,
    pages: usize,
    current: usize,
    pub ops: Vec<Recorded>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        RecordingCanvas {
            fonts: FontBook::base14(),
            width,
            height,
            pages: 1,
            current: 0,
            ops: Vec::new(),
        }
    }

    fn push(&mut self, op: Op) {
        self.ops.push(Recorded {
            page: self.current,
            op,
        });
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().filter_map(|r| r.op.text()).collect()
    }

    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.ops
            .iter()
            .filter(|r| r.page == page)
            .filter_map(|r| r.op.text())
            .collect()
    }

    pub fn count_text(&self, needle: &str) -> usize {
        self.texts().iter().filter(|t| **t == needle).count()
    }

    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.ops
            .iter()
            .find(|r| r.op.text() == Some(needle))
            .map(|r| r.page)
    }
}

impl Canvas for RecordingCanvas {
    fn page_width(&self) -> f32 {
        self.width
    }

    fn page_height(&self) -> f32 {
        self.height
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn new_page(&mut self) {
        self.pages += 1;
        self.current = self.pages - 1;
    }

    fn switch_to_page(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.pages {
            return Err(Error::PageOutOfRange {
                index,
                count: self.pages,
            });
        }
        self.current = index;
        Ok(())
    }

    fn measure_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> f32 {
        goal_report_pdf::text::measure(&self.fonts, text, width, style)
    }

    fn wrap_text(&self, text: &str, width: Option<f32>, style: &TextStyle) -> Vec<String> {
        goal_report_pdf::text::wrap(&self.fonts, text, width, style)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        width: Option<f32>,
        style: &TextStyle,
    ) -> f32 {
        let height = self.measure_text(text, width, style);
        self.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            height,
            style: *style,
        });
        height
    }

    fn draw_rect(&mut self, bounds: Bounds, _paint: &Paint) {
        self.push(Op::Rect { bounds });
    }

    fn draw_rounded_rect(&mut self, bounds: Bounds, _radius: f32, _paint: &Paint) {
        self.push(Op::RoundedRect { bounds });
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, _paint: &Paint) {
        self.push(Op::Circle { cx, cy, radius });
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), _color: Rgb, _line_width: f32) {
        self.push(Op::Line { from, to });
    }
}

/// Lay `data` out on a recording canvas with footers drawn after layout.
pub fn record(data: &ReportData, config: &ReportConfig) -> (RecordingCanvas, usize) {
    let g = config.geometry;
    let mut canvas = RecordingCanvas::new(g.width, g.height);
    let assembler = ReportAssembler::with_fonts(config, FontBook::base14());
    let pages = assembler
        .layout(&mut canvas, data, FooterStamp::Deferred)
        .expect("layout");
    (canvas, pages)
}

pub fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

pub fn count_occurrences(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}
