//! Header and footer repeated on every page.

use chrono::NaiveDate;

use crate::canvas::{Alignment, Bounds, Canvas, Paint, Rgb, TextStyle};
use crate::layout::PageGeometry;

const HEADER_BAND_HEIGHT: f32 = 50.0;
const BRAND: Rgb = Rgb::hex(0x4F46E5);
const SUBTITLE: Rgb = Rgb::hex(0xC7D2FE);
const DATE: Rgb = Rgb::hex(0xE0E7FF);
const FOOTER_RULE: Rgb = Rgb::hex(0xE5E7EB);
const FOOTER_TEXT: Rgb = Rgb::hex(0x6B7280);

/// Distance from the bottom edge to the footer rule and to the footer text top.
const FOOTER_RULE_OFFSET: f32 = 55.0;
const FOOTER_TEXT_OFFSET: f32 = 45.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ChromeText {
    pub brand: String,
    pub subtitle: String,
    pub attribution: String,
}

impl Default for ChromeText {
    fn default() -> Self {
        ChromeText {
            brand: "Aivora".into(),
            subtitle: "Goal Achievement Report".into(),
            attribution: "Generated by Aivora".into(),
        }
    }
}

pub struct PageChrome {
    text: ChromeText,
    date_label: String,
    geometry: PageGeometry,
}

impl PageChrome {
    pub fn new(text: ChromeText, generated_on: NaiveDate, geometry: PageGeometry) -> Self {
        PageChrome {
            text,
            date_label: format_generation_date(generated_on),
            geometry,
        }
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    /// Brand band across the top of the page. Stays above `geometry.content_top()`.
    pub fn draw_header<C: Canvas>(&self, canvas: &mut C) {
        let width = self.geometry.width;
        canvas.draw_rect(
            Bounds::new(0.0, 0.0, width, HEADER_BAND_HEIGHT),
            &Paint::fill(BRAND),
        );
        canvas.draw_text(
            &self.text.brand,
            self.geometry.margin,
            18.0,
            None,
            &TextStyle::new(18.0).bold().color(Rgb::WHITE),
        );
        canvas.draw_text(
            &self.text.subtitle,
            self.geometry.margin + 80.0,
            22.0,
            None,
            &TextStyle::new(9.0).color(SUBTITLE),
        );
        canvas.draw_text(
            &self.date_label,
            width - 120.0,
            22.0,
            Some(100.0),
            &TextStyle::new(8.0).color(DATE).align(Alignment::Right),
        );
    }

    /// Attribution and "Page N of M", inside the reserved footer strip.
    pub fn draw_footer<C: Canvas>(&self, canvas: &mut C, page_number: usize, total_pages: usize) {
        let g = &self.geometry;
        let rule_y = g.height - FOOTER_RULE_OFFSET;
        let text_y = g.height - FOOTER_TEXT_OFFSET;
        canvas.draw_line(
            (g.margin, rule_y),
            (g.width - g.margin, rule_y),
            FOOTER_RULE,
            0.5,
        );
        let style = TextStyle::new(8.0).color(FOOTER_TEXT);
        canvas.draw_text(&self.text.attribution, g.margin, text_y, None, &style);
        canvas.draw_text(
            &page_label(page_number, total_pages),
            g.width - g.margin - 100.0,
            text_y,
            Some(100.0),
            &style.align(Alignment::Right),
        );
    }
}

pub fn page_label(page_number: usize, total_pages: usize) -> String {
    format!("Page {page_number} of {total_pages}")
}

/// `Oct 19, 2026`
pub fn format_generation_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
