mod assemble;
pub mod canvas;
pub mod chrome;
pub mod config;
mod error;
pub mod fonts;
pub mod layout;
pub mod model;
mod pdf;
pub mod sections;
mod stats;
pub mod text;

pub use assemble::{ReportAssembler, ReportDocument, report_file_name};
pub use config::{FooterMode, PageSize, ReportConfig};
pub use error::Error;
pub use model::{
    GoalSnapshot, GoalStatus, InsightSnapshot, MoodPoint, ProgressEntry, ReportData,
    ReportRequest, StatsSnapshot,
};
pub use pdf::{DocumentInfo, PdfCanvas};

use std::path::Path;
use std::time::Instant;

/// Render `data` to a PDF. Any failure is reported as
/// [`Error::Generation`]; no partial document is returned.
pub fn render_report(data: &ReportData, config: &ReportConfig) -> Result<ReportDocument, Error> {
    let assembler = ReportAssembler::new(config).map_err(Error::into_generation)?;
    assembler.assemble(data).map_err(Error::into_generation)
}

/// Parse a JSON [`ReportRequest`] and render it. Malformed or invalid input is
/// reported as such, rendering failures as [`Error::Generation`].
pub fn render_report_json(json: &str, config: &ReportConfig) -> Result<ReportDocument, Error> {
    let t0 = Instant::now();
    let data = ReportRequest::from_json(json)?.into_report_data()?;
    let t_parse = t0.elapsed();

    let doc = render_report(&data, config)?;
    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms (goal {:?}, {} pages)",
        t_parse.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_parse).as_secs_f64() * 1000.0,
        data.goal.id.as_deref().unwrap_or("-"),
        doc.page_count(),
    );
    Ok(doc)
}

/// Render `data` and write the PDF to `output`. Returns the page count.
pub fn write_report(
    data: &ReportData,
    config: &ReportConfig,
    output: &Path,
) -> Result<usize, Error> {
    let t0 = Instant::now();

    let doc = render_report(data, config)?;
    let t_render = t0.elapsed();

    std::fs::write(output, doc.as_bytes()).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.as_bytes().len(),
    );

    Ok(doc.page_count())
}
