//! Sales Dashboard - CSV/spreadsheet sales analysis with interactive charts
//!
//! Loads a juice & smoothie sales export, normalizes its date, currency and
//! rating columns, and answers three questions: sales by category, sales
//! over time, and the satisfaction rating distribution.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
pub mod view;
