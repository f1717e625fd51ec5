//! Data Normalizer Module
//! Coerces the date, currency and rating columns into typed columns.
//!
//! Every transform is optional and independent: a column that is absent is
//! skipped, and a cell that fails to parse becomes null instead of aborting
//! the run.

use super::Dataset;
use crate::config::ColumnMapping;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Days between 0001-01-01 and 1970-01-01; polars stores dates as days
/// since the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// Two-digit-year slash forms go before `%Y/%m/%d`, which would otherwise
// read "01/05/24" as year 1.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M",
];

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Outcome of coercing one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCoercion {
    /// Column the values were read from
    pub column: String,
    pub parsed: usize,
    /// Non-blank cells that could not be parsed
    pub failed: usize,
}

/// Per-column coercion counts for one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub coercions: Vec<ColumnCoercion>,
}

impl NormalizeReport {
    pub fn total_failures(&self) -> usize {
        self.coercions.iter().map(|c| c.failed).sum()
    }

    /// Human-readable notes for columns that lost values.
    pub fn notes(&self) -> Vec<String> {
        self.coercions
            .iter()
            .filter(|c| c.failed > 0)
            .map(|c| {
                format!(
                    "{} value(s) in \"{}\" could not be parsed and were treated as missing.",
                    c.failed, c.column
                )
            })
            .collect()
    }
}

/// Parse a calendar date. Any time of day is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse currency text such as `$1,234.50` or `-£12`.
///
/// One leading currency symbol and all thousands separators are removed.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let rest = rest
        .strip_prefix(&CURRENCY_SYMBOLS[..])
        .unwrap_or(rest)
        .trim_start();

    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    let value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

/// Parse a numeric rating.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Handles the three typed-column rewrites.
pub struct Normalizer;

impl Normalizer {
    /// Produce a new dataset with typed date, sales and rating columns.
    ///
    /// - the date column is replaced by a `Date` column
    /// - the raw sales text is kept and a numeric sales column is added
    /// - the rating column is replaced by a `Float64` column
    pub fn normalize(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<(Dataset, NormalizeReport), NormalizeError> {
        let mut df = dataset.dataframe().clone();
        let mut report = NormalizeReport::default();

        if dataset.has_column(&columns.date) {
            let (days, coercion) = coerce(df.column(&columns.date)?, &columns.date, |s| {
                parse_date(s).map(date_to_days)
            })?;
            let dates = Column::new(columns.date.as_str().into(), days).cast(&DataType::Date)?;
            df.with_column(dates)?;
            report.coercions.push(coercion);
        }

        // Fall back to re-parsing the numeric column itself when the raw
        // currency column is absent.
        let sales_source = [&columns.sales_raw, &columns.sales]
            .into_iter()
            .find(|name| dataset.has_column(name));
        if let Some(source) = sales_source {
            let (amounts, coercion) = coerce(df.column(source)?, source, parse_currency)?;
            df.with_column(Column::new(columns.sales.as_str().into(), amounts))?;
            report.coercions.push(coercion);
        }

        if dataset.has_column(&columns.rating) {
            let (ratings, coercion) =
                coerce(df.column(&columns.rating)?, &columns.rating, parse_rating)?;
            df.with_column(Column::new(columns.rating.as_str().into(), ratings))?;
            report.coercions.push(coercion);
        }

        for coercion in &report.coercions {
            if coercion.failed > 0 {
                warn!(
                    "{} of {} values in '{}' could not be parsed",
                    coercion.failed,
                    coercion.parsed + coercion.failed,
                    coercion.column
                );
            } else {
                debug!("Parsed {} values in '{}'", coercion.parsed, coercion.column);
            }
        }

        Ok((Dataset::new(dataset.source_name(), df), report))
    }
}

/// Parse every cell of `column` through its string form.
///
/// Blank cells stay missing without counting as failures.
fn coerce<T>(
    column: &Column,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<(Vec<Option<T>>, ColumnCoercion), NormalizeError> {
    let text = column.cast(&DataType::String)?;
    let ca = text.as_materialized_series().str()?;

    let mut parsed = 0;
    let mut failed = 0;
    let values = ca
        .into_iter()
        .map(|cell| {
            let cell = cell.map(str::trim).filter(|s| !s.is_empty())?;
            let value = parse(cell);
            if value.is_some() {
                parsed += 1;
            } else {
                failed += 1;
            }
            value
        })
        .collect();

    Ok((
        values,
        ColumnCoercion {
            column: name.to_string(),
            parsed,
            failed,
        },
    ))
}
