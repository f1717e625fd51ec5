//! View module - pure rendering of a dataset into the dashboard view model
//!
//! [`render`] is the whole pipeline: normalize, aggregate, present. It has no
//! side effects besides logging, so any front end (the egui window, the
//! headless report) can call it again on every state change and get the same
//! result.

mod format;
mod presenter;
mod text;

pub use format::{format_amount, format_currency};

use crate::config::DashboardConfig;
use crate::data::{Dataset, NormalizeError, Normalizer};
use log::info;
use serde::Serialize;
use thiserror::Error;

pub const TAB_CATEGORY: &str = "Q1: Category Sales Comparison";
pub const TAB_DAILY: &str = "Q2: Sales Over Time";
pub const TAB_RATINGS: &str = "Q3: Satisfaction Ratings";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

/// (key, value) rows as display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    /// Line with a marker on every point
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Everything a chart backend needs to draw one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Draw x tick labels rotated (long date labels)
    pub rotate_labels: bool,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub tab: String,
    pub heading: String,
    pub caption: String,
    pub table: TableView,
    pub chart: ChartSpec,
    pub interpretation: Vec<String>,
    /// Extra figures shown under the table, e.g. ("Average per day", "$12.00")
    pub summary: Vec<(String, String)>,
}

/// One dashboard tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section {
    Ready(SectionView),
    /// Needed columns are missing or the aggregation failed
    Unavailable { tab: String, reason: String },
}

impl Section {
    pub fn tab(&self) -> &str {
        match self {
            Section::Ready(view) => &view.tab,
            Section::Unavailable { tab, .. } => tab,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}

/// Head and tail of the raw (un-normalized) dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub head: Vec<Vec<String>>,
    pub tail: Vec<Vec<String>>,
}

/// The complete derived view of one uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub source: String,
    pub row_count: usize,
    pub preview: Preview,
    /// Coercion notes, e.g. unparsable sales values
    pub notes: Vec<String>,
    pub category: Section,
    pub daily: Section,
    pub ratings: Section,
}

impl ViewModel {
    /// Sections in tab order.
    pub fn sections(&self) -> [&Section; 3] {
        [&self.category, &self.daily, &self.ratings]
    }
}

/// Run the full pipeline on a freshly loaded dataset.
pub fn render(raw: &Dataset, config: &DashboardConfig) -> Result<ViewModel, PipelineError> {
    let columns = &config.columns;
    let (normalized, report) = Normalizer::normalize(raw, columns)?;

    let preview = Preview {
        columns: raw.columns(),
        head: raw.head_rows(config.preview_rows),
        tail: raw.tail_rows(config.preview_rows),
    };

    let view = ViewModel {
        title: config.title.clone(),
        source: raw.source_name().to_string(),
        row_count: raw.row_count(),
        preview,
        notes: report.notes(),
        category: presenter::category_section(&normalized, columns),
        daily: presenter::daily_section(&normalized, columns),
        ratings: presenter::ratings_section(&normalized, columns),
    };

    let ready = view.sections().iter().filter(|s| s.is_ready()).count();
    info!("Rendered {}: {} of 3 sections available", view.source, ready);
    Ok(view)
}
