use std::fmt;

/// The error type returned by every fallible function in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input JSON could not be parsed as a report request.
    #[error("Failed to parse report data: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but violates the report data limits.
    #[error("Invalid report data: {0}")]
    InvalidData(String),

    /// A configured font file could not be read, parsed or embedded.
    #[error("Font error: {0}")]
    Font(String),

    /// `switch_to_page` was asked for a page the canvas never produced.
    #[error("page {index} out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Rendering failed; no document was produced.
    #[error("report generation failed: {0}")]
    Generation(String),
}

impl Error {
    pub(crate) fn generation(msg: impl fmt::Display) -> Self {
        Error::Generation(msg.to_string())
    }

    /// Fold any failure into [`Error::Generation`] so callers of the render entry
    /// points see a single failure mode.
    pub(crate) fn into_generation(self) -> Self {
        match self {
            Error::Generation(_) => self,
            other => Error::Generation(other.to_string()),
        }
    }
}
