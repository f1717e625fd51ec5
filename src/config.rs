//! Dashboard Configuration Module
//! Maps logical fields to the column names expected in the uploaded file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Logical field → source column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Product category label (grouping key of the first tab)
    pub category: String,
    /// Order date (grouping key of the second tab)
    pub date: String,
    /// Raw currency-formatted sales text, kept for display
    pub sales_raw: String,
    /// Numeric sales column derived from `sales_raw`
    pub sales: String,
    /// Service satisfaction rating
    pub rating: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            category: "Category".to_string(),
            date: "Date Ordered".to_string(),
            sales_raw: "$ Sales".to_string(),
            sales: "Sales".to_string(),
            rating: "Service Satisfaction Rating".to_string(),
        }
    }
}

/// Top-level settings shared by the GUI and the headless report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Rows shown in each of the head/tail preview tables
    pub preview_rows: usize,
    pub columns: ColumnMapping,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Juice & Smoothie Sales Dashboard".to_string(),
            preview_rows: 5,
            columns: ColumnMapping::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
