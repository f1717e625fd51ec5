//! Per-tab presenters: aggregate → table, chart spec and interpretation.

use super::{
    format_amount, format_currency, ChartKind, ChartPoint, ChartSpec, Section, SectionView,
    TableView, TAB_CATEGORY, TAB_DAILY, TAB_RATINGS,
};
use crate::config::ColumnMapping;
use crate::data::Dataset;
use crate::stats::{
    AggregateError, CategoryAggregate, DailyAggregate, RatingAggregate, SalesAggregator,
};
use log::warn;

const SALES_AXIS: &str = "Total Sales ($)";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn category_section(dataset: &Dataset, columns: &ColumnMapping) -> Section {
    match SalesAggregator::category_totals(dataset, columns) {
        Ok(agg) => Section::Ready(present_categories(&agg, columns)),
        Err(err) => unavailable(TAB_CATEGORY, err),
    }
}

pub(super) fn daily_section(dataset: &Dataset, columns: &ColumnMapping) -> Section {
    match SalesAggregator::daily_totals(dataset, columns) {
        Ok(agg) => Section::Ready(present_daily(&agg, columns)),
        Err(err) => unavailable(TAB_DAILY, err),
    }
}

pub(super) fn ratings_section(dataset: &Dataset, columns: &ColumnMapping) -> Section {
    let result = SalesAggregator::rating_counts(dataset, columns).and_then(|agg| {
        let mean = SalesAggregator::mean_rating(dataset, columns)?;
        Ok((agg, mean))
    });
    match result {
        Ok((agg, mean)) => Section::Ready(present_ratings(&agg, mean, columns)),
        Err(err) => unavailable(TAB_RATINGS, err),
    }
}

fn unavailable(tab: &str, err: AggregateError) -> Section {
    warn!("Skipping '{}': {}", tab, err);
    let reason = match err {
        AggregateError::MissingColumn(names) => format!("Missing column(s): {}", names),
        other => other.to_string(),
    };
    Section::Unavailable {
        tab: tab.to_string(),
        reason,
    }
}

fn present_categories(agg: &CategoryAggregate, columns: &ColumnMapping) -> SectionView {
    let entries = agg.entries();

    let interpretation = match agg.top() {
        Some((category, total)) => vec![
            format!(
                "{} has the highest total sales (about {}).",
                category,
                format_currency(total)
            ),
            "This comparison helps management see which category is performing better \
             in terms of revenue."
                .to_string(),
        ],
        None => vec!["No category sales data available.".to_string()],
    };

    let mut summary = vec![
        ("Categories".to_string(), agg.len().to_string()),
        ("Total sales".to_string(), format_currency(agg.total())),
    ];
    if let Some(mean) = agg.mean() {
        summary.push(("Average per category".to_string(), format_currency(mean)));
    }

    SectionView {
        tab: TAB_CATEGORY.to_string(),
        heading: "Category Sales Comparison".to_string(),
        caption: "Total sales by category:".to_string(),
        table: TableView {
            headers: vec![columns.category.clone(), SALES_AXIS.to_string()],
            rows: entries
                .iter()
                .map(|(category, total)| vec![category.clone(), format_amount(*total)])
                .collect(),
        },
        chart: ChartSpec {
            kind: ChartKind::Bar,
            title: "Total Sales by Category".to_string(),
            x_label: columns.category.clone(),
            y_label: SALES_AXIS.to_string(),
            rotate_labels: false,
            points: entries
                .iter()
                .map(|(category, total)| ChartPoint {
                    label: category.clone(),
                    value: *total,
                })
                .collect(),
        },
        interpretation,
        summary,
    }
}

fn present_daily(agg: &DailyAggregate, columns: &ColumnMapping) -> SectionView {
    let entries = agg.entries();

    let interpretation = match agg.top() {
        Some((day, total)) => vec![
            format!(
                "The highest sales day is {} with about {} in total sales.",
                day.format(DATE_FORMAT),
                format_currency(total)
            ),
            "This time series helps management identify busy days and slower days when \
             promotions or staffing changes might be needed."
                .to_string(),
        ],
        None => vec!["No dated sales data available.".to_string()],
    };

    let mut summary = vec![("Days with sales".to_string(), agg.len().to_string())];
    if let Some(mean) = agg.mean() {
        summary.push(("Average per day".to_string(), format_currency(mean)));
    }
    if let (Some((first, _)), Some((last, _))) = (entries.first(), entries.last()) {
        summary.push(("First day".to_string(), first.format(DATE_FORMAT).to_string()));
        summary.push(("Last day".to_string(), last.format(DATE_FORMAT).to_string()));
    }

    SectionView {
        tab: TAB_DAILY.to_string(),
        heading: "Question 2: Sales Over Time".to_string(),
        caption: "Daily total sales:".to_string(),
        table: TableView {
            headers: vec![columns.date.clone(), SALES_AXIS.to_string()],
            rows: entries
                .iter()
                .map(|(day, total)| {
                    vec![day.format(DATE_FORMAT).to_string(), format_amount(*total)]
                })
                .collect(),
        },
        chart: ChartSpec {
            kind: ChartKind::Line,
            title: "Daily Sales Over Time".to_string(),
            x_label: columns.date.clone(),
            y_label: SALES_AXIS.to_string(),
            rotate_labels: true,
            points: entries
                .iter()
                .map(|(day, total)| ChartPoint {
                    label: day.format(DATE_FORMAT).to_string(),
                    value: *total,
                })
                .collect(),
        },
        interpretation,
        summary,
    }
}

fn present_ratings(
    agg: &RatingAggregate,
    mean: Option<f64>,
    columns: &ColumnMapping,
) -> SectionView {
    let entries = agg.entries();

    let interpretation = match agg.top() {
        Some((rating, count)) => vec![
            format!(
                "The most common service satisfaction rating is {}, with {} customers \
                 giving this score.",
                rating, count
            ),
            "Higher ratings indicate customers were generally satisfied with service. \
             If low ratings appear often, this may signal areas for improvement."
                .to_string(),
        ],
        None => vec!["No satisfaction ratings available.".to_string()],
    };

    let mut summary = vec![("Rated customers".to_string(), agg.total().to_string())];
    if let Some(mean) = mean {
        summary.push(("Average rating".to_string(), format!("{:.2}", mean)));
    }

    SectionView {
        tab: TAB_RATINGS.to_string(),
        heading: "Question 3: Service Satisfaction Rating Distribution".to_string(),
        caption: "Count of customers by service satisfaction rating:".to_string(),
        table: TableView {
            headers: vec!["Rating".to_string(), "Count".to_string()],
            rows: entries
                .iter()
                .map(|(rating, count)| vec![rating.to_string(), count.to_string()])
                .collect(),
        },
        chart: ChartSpec {
            kind: ChartKind::Bar,
            title: "Service Satisfaction Rating Distribution".to_string(),
            x_label: columns.rating.clone(),
            y_label: "Number of Customers".to_string(),
            rotate_labels: false,
            points: entries
                .iter()
                .map(|(rating, count)| ChartPoint {
                    label: rating.to_string(),
                    value: *count as f64,
                })
                .collect(),
        },
        interpretation,
        summary,
    }
}
