//! Sales Aggregator Module
//! Category totals, daily totals and rating counts over a normalized dataset.

use crate::config::ColumnMapping;
use crate::data::{days_to_date, Dataset};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use statrs::statistics::Statistics;
use thiserror::Error;

/// Output column holding per-rating counts.
const COUNT_COL: &str = "count";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Sorted `(key, value)` entries of one grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<K, V> {
    entries: Vec<(K, V)>,
}

/// Category → total revenue, descending by revenue.
pub type CategoryAggregate = Aggregate<String, f64>;
/// Date → total revenue, ascending by date.
pub type DailyAggregate = Aggregate<NaiveDate, f64>;
/// Rating → number of customers, ascending by rating.
pub type RatingAggregate = Aggregate<i64, u64>;

impl<K, V: PartialOrd + Copy> Aggregate<K, V> {
    pub fn new(entries: Vec<(K, V)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(K, V)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the largest value. Ties go to the earliest entry.
    pub fn top(&self) -> Option<(&K, V)> {
        let mut best: Option<(&K, V)> = None;
        for (key, value) in &self.entries {
            if best.map_or(true, |(_, current)| *value > current) {
                best = Some((key, *value));
            }
        }
        best
    }
}

impl<K> Aggregate<K, f64> {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Mean value per key; `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.iter().map(|(_, v)| *v).mean())
    }
}

impl<K> Aggregate<K, u64> {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

/// Handles the three group-by reductions.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Total sales per category, highest first.
    pub fn category_totals(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<CategoryAggregate, AggregateError> {
        let category = columns.category.as_str();
        let sales = columns.sales.as_str();
        require_columns(dataset, columns, &[category, sales])?;

        let grouped = dataset
            .dataframe()
            .clone()
            .lazy()
            .filter(col(category).is_not_null().and(col(sales).is_not_null()))
            .group_by_stable([col(category).cast(DataType::String)])
            .agg([col(sales).sum()])
            .sort(
                [sales],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        let keys = grouped.column(category)?.as_materialized_series().str()?;
        let totals = grouped.column(sales)?.as_materialized_series().f64()?;

        let entries: Vec<(String, f64)> = keys
            .into_iter()
            .zip(totals.into_iter())
            .filter_map(|(key, total)| Some((key?.to_string(), total?)))
            .collect();

        debug!("Category totals: {} groups", entries.len());
        Ok(Aggregate::new(entries))
    }

    /// Total sales per calendar day, earliest first.
    pub fn daily_totals(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<DailyAggregate, AggregateError> {
        let date = columns.date.as_str();
        let sales = columns.sales.as_str();
        require_columns(dataset, columns, &[date, sales])?;

        let grouped = dataset
            .dataframe()
            .clone()
            .lazy()
            .filter(col(date).is_not_null().and(col(sales).is_not_null()))
            .group_by_stable([col(date)])
            .agg([col(sales).sum()])
            .sort([date], SortMultipleOptions::default().with_maintain_order(true))
            .collect()?;

        let day_numbers = grouped.column(date)?.cast(&DataType::Int32)?;
        let days = day_numbers.as_materialized_series().i32()?;
        let totals = grouped.column(sales)?.as_materialized_series().f64()?;

        let entries: Vec<(NaiveDate, f64)> = days
            .into_iter()
            .zip(totals.into_iter())
            .filter_map(|(day, total)| Some((days_to_date(day?)?, total?)))
            .collect();

        debug!("Daily totals: {} days", entries.len());
        Ok(Aggregate::new(entries))
    }

    /// Customers per rating, lowest rating first.
    ///
    /// Ratings are bucketed to the nearest whole number.
    pub fn rating_counts(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<RatingAggregate, AggregateError> {
        let rating = columns.rating.as_str();
        let buckets: Vec<Option<i64>> = Self::ratings(dataset, columns)?
            .into_iter()
            .map(|r| r.map(|v| v.round() as i64))
            .collect();

        let grouped = DataFrame::new(vec![Column::new(rating.into(), buckets)])?
            .lazy()
            .filter(col(rating).is_not_null())
            .group_by_stable([col(rating)])
            .agg([len().alias(COUNT_COL)])
            .sort([rating], SortMultipleOptions::default().with_maintain_order(true))
            .collect()?;

        let keys = grouped.column(rating)?.as_materialized_series().i64()?;
        let count_col = grouped.column(COUNT_COL)?.cast(&DataType::UInt64)?;
        let counts = count_col.as_materialized_series().u64()?;

        let entries: Vec<(i64, u64)> = keys
            .into_iter()
            .zip(counts.into_iter())
            .filter_map(|(key, count)| Some((key?, count?)))
            .collect();

        debug!("Rating counts: {} distinct ratings", entries.len());
        Ok(Aggregate::new(entries))
    }

    /// Mean of every parseable rating (before bucketing).
    pub fn mean_rating(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<Option<f64>, AggregateError> {
        let values: Vec<f64> = Self::ratings(dataset, columns)?
            .into_iter()
            .flatten()
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().mean()))
    }

    fn ratings(
        dataset: &Dataset,
        columns: &ColumnMapping,
    ) -> Result<Vec<Option<f64>>, AggregateError> {
        let rating = columns.rating.as_str();
        require_columns(dataset, columns, &[rating])?;

        let values = dataset.dataframe().column(rating)?.cast(&DataType::Float64)?;
        let values = values
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect();
        Ok(values)
    }
}

/// A missing derived sales column is reported as `sales_raw`, the column the
/// file has to provide.
fn require_columns(
    dataset: &Dataset,
    columns: &ColumnMapping,
    names: &[&str],
) -> Result<(), AggregateError> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !dataset.has_column(name))
        .map(|name| {
            if name == columns.sales {
                columns.sales_raw.as_str()
            } else {
                name
            }
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AggregateError::MissingColumn(missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Normalizer;

    fn normalized(columns: Vec<Column>) -> Dataset {
        let raw = Dataset::new("test.csv", DataFrame::new(columns).unwrap());
        Normalizer::normalize(&raw, &ColumnMapping::default())
            .unwrap()
            .0
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_totals_scenario() {
        let ds = normalized(vec![
            Column::new("Category".into(), vec!["Juice", "Juice", "Smoothie"]),
            Column::new("$ Sales".into(), vec!["$10.00", "$5.00", "$20.00"]),
        ]);

        let agg = SalesAggregator::category_totals(&ds, &ColumnMapping::default()).unwrap();
        assert_eq!(
            agg.entries(),
            &[("Smoothie".to_string(), 20.0), ("Juice".to_string(), 15.0)]
        );
        assert_eq!(agg.top(), Some((&"Smoothie".to_string(), 20.0)));
        assert_eq!(agg.total(), 35.0);
        assert_eq!(agg.mean(), Some(17.5));
    }

    #[test]
    fn test_category_ties_keep_first_seen_order() {
        let ds = normalized(vec![
            Column::new("Category".into(), vec!["Berry", "Apple", "Citrus"]),
            Column::new("$ Sales".into(), vec!["$5", "$5", "$9"]),
        ]);

        let agg = SalesAggregator::category_totals(&ds, &ColumnMapping::default()).unwrap();
        let keys: Vec<&str> = agg.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Citrus", "Berry", "Apple"]);
    }

    #[test]
    fn test_unparsable_sales_are_excluded() {
        let ds = normalized(vec![
            Column::new("Category".into(), vec![Some("Juice"), Some("Juice"), None]),
            Column::new("$ Sales".into(), vec!["$10.00", "N/A", "$7.00"]),
            Column::new(
                "Date Ordered".into(),
                vec!["2024-01-02", "2024-01-02", "2024-01-01"],
            ),
        ]);
        let columns = ColumnMapping::default();

        let categories = SalesAggregator::category_totals(&ds, &columns).unwrap();
        assert_eq!(categories.entries(), &[("Juice".to_string(), 10.0)]);

        let daily = SalesAggregator::daily_totals(&ds, &columns).unwrap();
        assert_eq!(
            daily.entries(),
            &[(date(2024, 1, 1), 7.0), (date(2024, 1, 2), 10.0)]
        );
    }

    #[test]
    fn test_daily_totals_sorted_by_date() {
        let ds = normalized(vec![
            Column::new(
                "Date Ordered".into(),
                vec!["03/02/2024", "2024-01-15", "bad", "2024-03-02 10:15:00"],
            ),
            Column::new("$ Sales".into(), vec!["$1.50", "$2.00", "$4.00", "$3.50"]),
        ]);

        let daily = SalesAggregator::daily_totals(&ds, &ColumnMapping::default()).unwrap();
        assert_eq!(
            daily.entries(),
            &[(date(2024, 1, 15), 2.0), (date(2024, 3, 2), 5.0)]
        );
        assert_eq!(daily.top(), Some((&date(2024, 3, 2), 5.0)));
    }

    #[test]
    fn test_rating_counts_scenario() {
        let ds = normalized(vec![Column::new(
            "Service Satisfaction Rating".into(),
            vec![Some(3i64), Some(5), Some(5), None, Some(4)],
        )]);
        let columns = ColumnMapping::default();

        let agg = SalesAggregator::rating_counts(&ds, &columns).unwrap();
        assert_eq!(agg.entries(), &[(3, 1), (4, 1), (5, 2)]);
        assert_eq!(agg.top(), Some((&5, 2)));
        assert_eq!(agg.total(), 4);

        let mean = SalesAggregator::mean_rating(&ds, &columns).unwrap().unwrap();
        assert!((mean - 4.25).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_ratings_round_to_nearest() {
        let ds = normalized(vec![Column::new(
            "Service Satisfaction Rating".into(),
            vec!["4.4", "4.6", "5", "oops"],
        )]);

        let agg = SalesAggregator::rating_counts(&ds, &ColumnMapping::default()).unwrap();
        assert_eq!(agg.entries(), &[(4, 1), (5, 2)]);
    }

    #[test]
    fn test_missing_columns_reported() {
        let ds = normalized(vec![Column::new("Category".into(), vec!["Juice"])]);
        let columns = ColumnMapping::default();

        let err = SalesAggregator::category_totals(&ds, &columns).unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn(ref name) if name == "$ Sales"));

        let err = SalesAggregator::daily_totals(&ds, &columns).unwrap_err();
        assert!(
            matches!(err, AggregateError::MissingColumn(ref name) if name == "Date Ordered, $ Sales")
        );

        assert!(SalesAggregator::rating_counts(&ds, &columns).is_err());
    }

    #[test]
    fn test_empty_aggregate_has_no_top() {
        let agg: RatingAggregate = Aggregate::new(Vec::new());
        assert!(agg.is_empty());
        assert_eq!(agg.top(), None);

        let daily: DailyAggregate = Aggregate::new(Vec::new());
        assert_eq!(daily.mean(), None);
    }
}
