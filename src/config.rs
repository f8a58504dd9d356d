//! Render configuration: page size, chrome text, footer timing, fonts.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::chrome::ChromeText;
use crate::fonts::FontConfig;
use crate::layout::PageGeometry;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    pub fn geometry(self) -> PageGeometry {
        match self {
            PageSize::A4 => PageGeometry::a4(),
            PageSize::Letter => PageGeometry::letter(),
        }
    }
}

/// When "Page N of M" footers are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FooterMode {
    /// Each page gets its footer as it is closed. Costs one extra layout pass
    /// to learn the page total.
    #[default]
    Immediate,
    /// All footers are drawn after layout by revisiting each page.
    Deferred,
}

impl FooterMode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(FooterMode::Immediate),
            "deferred" => Some(FooterMode::Deferred),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub chrome: ChromeText,
    pub footer_mode: FooterMode,
    pub fonts: FontConfig,
    /// FlateDecode content streams.
    pub compress: bool,
    /// Date printed in the header and stored as the creation date. `None`
    /// means today.
    pub generated_on: Option<NaiveDate>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            geometry: PageGeometry::default(),
            chrome: ChromeText::default(),
            footer_mode: FooterMode::default(),
            fonts: FontConfig::default(),
            compress: true,
            generated_on: None,
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by `GOAL_REPORT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ReportConfig::default();
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        config.fonts.regular = path("GOAL_REPORT_FONT_REGULAR");
        config.fonts.bold = path("GOAL_REPORT_FONT_BOLD");
        config.fonts.italic = path("GOAL_REPORT_FONT_ITALIC");
        if let Some(raw) = lookup("GOAL_REPORT_FOOTERS") {
            match FooterMode::parse(&raw) {
                Some(mode) => config.footer_mode = mode,
                None => log::warn!(
                    "ignoring GOAL_REPORT_FOOTERS={raw:?}; expected immediate or deferred"
                ),
            }
        }
        if let Some(brand) = lookup("GOAL_REPORT_BRAND").filter(|b| !b.trim().is_empty()) {
            config.chrome.attribution = format!("Generated by {brand}");
            config.chrome.brand = brand;
        }
        config
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.geometry = size.geometry();
        self
    }

    pub fn generation_date(&self) -> NaiveDate {
        self.generated_on
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
