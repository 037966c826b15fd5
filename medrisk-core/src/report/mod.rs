//! Report rendering: dataset list, per-dataset risk cards.
//!
//! Every view goes through [`crate::scoring::assess`], so the list and the
//! risk card always show the same score for the same dataset.

pub mod html;
pub mod list;
pub mod markdown;
pub mod text;

pub use list::{DatasetSummary, summarize};

use crate::catalog::{Catalog, Modality, Region};
use crate::dataset::Dataset;
use crate::scoring::{RiskAssessment, RiskBand, assess};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for empty cells and unscored datasets.
pub const EMPTY_CELL: &str = "—";

/// Output format for reports and listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Html,
    Json,
    Text,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Text => "text",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Rendering knobs shared by every format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Decimal places for scores.
    pub precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Band label plus score, or [`EMPTY_CELL`] when nothing is answered.
pub fn format_score(score: f64, options: &RenderOptions) -> String {
    if score == 0.0 {
        EMPTY_CELL.to_string()
    } else {
        format!(
            "{} ({:.prec$})",
            RiskBand::from_score(score),
            score,
            prec = options.precision
        )
    }
}

/// Everything a risk card shows for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: String,
    pub modalities: Vec<Modality>,
    pub regions: Vec<Region>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub assessment: RiskAssessment,
}

impl DatasetReport {
    pub fn build(dataset: &Dataset, catalog: &Catalog) -> Self {
        Self {
            id: dataset.id.clone(),
            name: dataset.name.clone(),
            description: dataset.description.clone(),
            source: dataset.source.clone(),
            modalities: dataset.modalities.clone(),
            regions: dataset.regions.clone(),
            created_at: dataset.created_at,
            assessment: assess(dataset, catalog),
        }
    }

    /// Render in the requested format.
    pub fn render(
        &self,
        format: ReportFormat,
        options: &RenderOptions,
    ) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Markdown => Ok(markdown::report_to_markdown(self, options)),
            ReportFormat::Text => Ok(text::report_to_text(self, options)),
            ReportFormat::Html => Ok(html::report_to_html(self, options)),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

pub(crate) fn or_empty(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { EMPTY_CELL } else { trimmed }
}

pub(crate) fn join_or_empty(values: &[String]) -> String {
    if values.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        values.join(", ")
    }
}

pub(crate) fn join_labels<T: fmt::Display>(values: &[T]) -> String {
    if values.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
