//! Immutable tabular dataset produced by the loader.

use polars::prelude::*;

/// An uploaded file as rows × named columns.
///
/// Cloning is cheap: polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    df: DataFrame,
}

impl Dataset {
    pub fn new(source_name: impl Into<String>, df: DataFrame) -> Self {
        Self {
            source_name: source_name.into(),
            df,
        }
    }

    /// File name the dataset was loaded from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Get list of column names.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    /// First `n` rows, every cell rendered as display text.
    pub fn head_rows(&self, n: usize) -> Vec<Vec<String>> {
        rows_as_text(&self.df.head(Some(n)))
    }

    /// Last `n` rows, every cell rendered as display text.
    pub fn tail_rows(&self, n: usize) -> Vec<Vec<String>> {
        rows_as_text(&self.df.tail(Some(n)))
    }
}

fn rows_as_text(df: &DataFrame) -> Vec<Vec<String>> {
    (0..df.height())
        .map(|i| {
            df.get_columns()
                .iter()
                .map(|col| col.get(i).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Missing values render as an empty cell; strings without polars' quoting.
fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}
