//! Data module - file loading and column normalization

mod dataset;
mod loader;
mod normalizer;

pub use dataset::Dataset;
pub use loader::{DataLoader, LoaderError, SPREADSHEET_EXTENSIONS};
pub use normalizer::{
    parse_currency, parse_date, parse_rating, ColumnCoercion, NormalizeError, NormalizeReport,
    Normalizer,
};

pub(crate) use normalizer::days_to_date;
