//! Dataset Loader Module
//! Parses an uploaded CSV or spreadsheet into a polars-backed [`Dataset`].

use super::Dataset;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Extensions parsed as a workbook; everything else is read as CSV.
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook contains no worksheets")]
    NoWorksheet,
    #[error("File contains no columns")]
    Empty,
}

/// Handles file loading: CSV through polars, workbooks through calamine.
pub struct DataLoader;

impl DataLoader {
    /// Whether `file_name` should be parsed as a spreadsheet.
    pub fn is_spreadsheet(file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Read a file from disk.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset, LoaderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::load_bytes(&file_name, bytes)
    }

    /// Parse an uploaded byte stream, choosing the reader from the file name.
    pub fn load_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Dataset, LoaderError> {
        let df = if Self::is_spreadsheet(file_name) {
            debug!("Parsing {} as spreadsheet", file_name);
            Self::read_spreadsheet(bytes)?
        } else {
            debug!("Parsing {} as CSV", file_name);
            Self::read_csv(bytes)?
        };

        if df.width() == 0 {
            return Err(LoaderError::Empty);
        }

        info!(
            "Loaded {}: {} rows, {} columns",
            file_name,
            df.height(),
            df.width()
        );
        Ok(Dataset::new(file_name, df))
    }

    fn read_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        // Infer over the whole file so a late "N/A" widens the column to text
        // instead of failing the read.
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    fn read_spreadsheet(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoWorksheet)??;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Err(LoaderError::Empty);
        };

        let names = header_names(header);
        let mut cells: Vec<Vec<&Data>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (idx, cell) in row.iter().enumerate().take(names.len()) {
                cells[idx].push(cell);
            }
        }

        let columns = names
            .iter()
            .zip(cells.iter())
            .map(|(name, values)| build_column(name, values))
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

/// Header row → unique column names.
///
/// Blank headers become `Unnamed: <idx>`; repeats get a `.<n>` suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_text(cell)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("Unnamed: {}", idx));

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// All-numeric columns become Float64, anything else becomes text.
fn build_column(name: &str, values: &[&Data]) -> Column {
    let has_values = values.iter().any(|c| !matches!(c, Data::Empty));
    let all_numeric = values
        .iter()
        .all(|c| matches!(c, Data::Empty | Data::Int(_) | Data::Float(_)));

    if has_values && all_numeric {
        let numbers: Vec<Option<f64>> = values
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), numbers)
    } else {
        let text: Vec<Option<String>> = values.iter().map(|c| cell_text(c)).collect();
        Column::new(name.into(), text)
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(v.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(format_datetime),
        other => Some(other.to_string()),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_detection() {
        assert!(DataLoader::is_spreadsheet("sales.xlsx"));
        assert!(DataLoader::is_spreadsheet("SALES.XLSX"));
        assert!(DataLoader::is_spreadsheet("legacy.xls"));
        assert!(!DataLoader::is_spreadsheet("sales.csv"));
        assert!(!DataLoader::is_spreadsheet("sales"));
        assert!(!DataLoader::is_spreadsheet("xlsx"));
    }

    #[test]
    fn test_load_csv_bytes() {
        let csv = "Category,$ Sales\nJuice,\"$1,250.00\"\nSmoothie,$20.00\n";
        let ds = DataLoader::load_bytes("sales.csv", csv.as_bytes().to_vec()).unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.columns(), vec!["Category", "$ Sales"]);
        assert_eq!(ds.head_rows(1), vec![vec!["Juice", "$1,250.00"]]);
    }

    #[test]
    fn test_late_text_cell_widens_csv_column() {
        let mut csv = String::from("Category,Service Satisfaction Rating\n");
        for idx in 0..20_000 {
            csv.push_str(&format!("Juice,{}\n", idx % 5 + 1));
        }
        csv.push_str("Smoothie,N/A\n");

        let ds = DataLoader::load_bytes("late.csv", csv.into_bytes()).unwrap();
        let ratings = ds.dataframe().column("Service Satisfaction Rating").unwrap();

        assert_eq!(ds.row_count(), 20_001);
        assert_eq!(ratings.dtype(), &DataType::String);
        assert_eq!(ds.tail_rows(1), vec![vec!["Smoothie", "N/A"]]);
    }

    #[test]
    fn test_empty_csv_is_fatal() {
        assert!(DataLoader::load_bytes("empty.csv", Vec::new()).is_err());
    }

    #[test]
    fn test_garbage_spreadsheet_is_fatal() {
        let err = DataLoader::load_bytes("broken.xlsx", b"not a zip archive".to_vec());
        assert!(err.is_err());
    }

    #[test]
    fn test_header_names_are_unique() {
        let header = vec![
            Data::String("Sales".to_string()),
            Data::Empty,
            Data::String("Sales".to_string()),
            Data::String("Sales".to_string()),
        ];
        assert_eq!(
            header_names(&header),
            vec!["Sales", "Unnamed: 1", "Sales.1", "Sales.2"]
        );
    }

    #[test]
    fn test_build_column_types() {
        let numeric = [Data::Int(3), Data::Empty, Data::Float(4.5)];
        let refs: Vec<&Data> = numeric.iter().collect();
        let col = build_column("Rating", &refs);
        assert_eq!(col.dtype(), &DataType::Float64);
        assert_eq!(col.null_count(), 1);

        let mixed = [Data::Int(3), Data::String("N/A".to_string())];
        let refs: Vec<&Data> = mixed.iter().collect();
        let col = build_column("Rating", &refs);
        assert_eq!(col.dtype(), &DataType::String);
    }

    #[test]
    fn test_format_datetime_drops_midnight() {
        let midnight = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_datetime(midnight), "2024-03-09");

        let afternoon = midnight.with_hour(15).unwrap();
        assert_eq!(format_datetime(afternoon), "2024-03-09 15:00:00");
    }
}
