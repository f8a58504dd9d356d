//! Runs the sections in order over a canvas and packages the result.

use std::io::{self, Write};
use std::time::Instant;

use crate::canvas::Canvas;
use crate::chrome::PageChrome;
use crate::config::{FooterMode, ReportConfig};
use crate::error::Error;
use crate::fonts::FontBook;
use crate::layout::{FooterStamp, PageFlow};
use crate::model::{GoalSnapshot, ReportData};
use crate::pdf::{DocumentInfo, PdfCanvas};
use crate::sections::Section;

/// Room asked for before the insights section starts.
const INSIGHTS_LEAD_RESERVE: f32 = 150.0;

const WRITE_CHUNK: usize = 64 * 1024;

pub struct ReportAssembler<'c> {
    config: &'c ReportConfig,
    fonts: FontBook,
    chrome: PageChrome,
}

impl<'c> ReportAssembler<'c> {
    /// Load the configured fonts and prepare the page chrome.
    pub fn new(config: &'c ReportConfig) -> Result<Self, Error> {
        let fonts = FontBook::load(&config.fonts)?;
        Ok(Self::with_fonts(config, fonts))
    }

    pub fn with_fonts(config: &'c ReportConfig, fonts: FontBook) -> Self {
        let chrome = PageChrome::new(
            config.chrome.clone(),
            config.generation_date(),
            config.geometry,
        );
        ReportAssembler {
            config,
            fonts,
            chrome,
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Lay every section of `data` out on `canvas`, which must hold exactly one
    /// empty page. Returns the number of pages used.
    pub fn layout<C: Canvas>(
        &self,
        canvas: &mut C,
        data: &ReportData,
        footers: FooterStamp,
    ) -> Result<usize, Error> {
        let mut flow = PageFlow::new(canvas, &self.chrome, self.config.geometry, footers);
        let mut cursor = flow.begin();
        for section in Section::ORDER {
            if !section.has_content(data) {
                log::debug!("{section:?}: nothing to show, skipped");
                continue;
            }
            if section == Section::Insights {
                cursor = flow.reserve(cursor, INSIGHTS_LEAD_RESERVE);
            }
            log::debug!(
                "{section:?} starts on page {} at y={:.1}",
                cursor.page + 1,
                cursor.y
            );
            cursor = section.render(cursor, &mut flow, data);
        }
        flow.finish()
    }

    /// Render `data` into a finished PDF.
    pub fn assemble(&self, data: &ReportData) -> Result<ReportDocument, Error> {
        let t0 = Instant::now();
        let g = self.config.geometry;

        let footers = match self.config.footer_mode {
            FooterMode::Immediate => {
                let mut counting = PdfCanvas::new(&self.fonts, g.width, g.height);
                let total_pages = self.layout(&mut counting, data, FooterStamp::Suppressed)?;
                FooterStamp::Immediate { total_pages }
            }
            FooterMode::Deferred => FooterStamp::Deferred,
        };
        let t_paginate = t0.elapsed();

        let mut canvas = PdfCanvas::new(&self.fonts, g.width, g.height);
        let page_count = self.layout(&mut canvas, data, footers)?;
        let t_layout = t0.elapsed();

        let title = format!("{}: {}", self.config.chrome.subtitle, data.goal.title.trim());
        let bytes = canvas.finish(&DocumentInfo {
            title: &title,
            created: self.config.generation_date(),
            compress: self.config.compress,
        })?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: paginate={:.1}ms, layout={:.1}ms, assemble={:.1}ms, total={:.1}ms \
             ({} pages, {} bytes)",
            t_paginate.as_secs_f64() * 1000.0,
            (t_layout - t_paginate).as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            page_count,
            bytes.len(),
        );

        Ok(ReportDocument {
            bytes,
            page_count,
            file_name: report_file_name(&data.goal),
        })
    }
}

/// A finished report, ready to be saved or streamed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDocument {
    bytes: Vec<u8>,
    page_count: usize,
    file_name: String,
}

impl ReportDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    pub fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    /// Suggested download name, `goal-report-<goal id>.pdf`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn into_reader(self) -> io::Cursor<Vec<u8>> {
        io::Cursor::new(self.bytes)
    }

    /// Stream the document to `out` in bounded chunks.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for chunk in self.bytes.chunks(WRITE_CHUNK) {
            out.write_all(chunk)?;
        }
        out.flush()
    }
}

/// `goal-report-<id>.pdf`, falling back to a slug of the title when the goal
/// has no id.
pub fn report_file_name(goal: &GoalSnapshot) -> String {
    let key = match goal.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => slug(id),
        None => slug(&goal.title),
    };
    if key.is_empty() {
        "goal-report.pdf".to_string()
    } else {
        format!("goal-report-{key}.pdf")
    }
}

fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}
