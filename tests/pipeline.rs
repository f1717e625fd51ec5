//! End-to-end: file on disk → loader → render.

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use sales_dashboard::charts::ChartRenderer;
use sales_dashboard::config::DashboardConfig;
use sales_dashboard::data::DataLoader;
use sales_dashboard::view::{self, Section, ViewModel};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const JUICE_CSV: &str = "\
Category,Date Ordered,$ Sales,Service Satisfaction Rating
Juice,2024-01-02,$10.00,3
Juice,2024-01-01,$5.00,5
Smoothie,2024-01-02,\"$1,020.00\",5
Smoothie,2024-01-03,N/A,
Juice,01/03/2024,$2.50,4
";

fn render_file(path: &Path) -> ViewModel {
    let dataset = DataLoader::load_path(path).unwrap();
    view::render(&dataset, &DashboardConfig::default()).unwrap()
}

fn ready_rows(section: &Section) -> Vec<Vec<String>> {
    match section {
        Section::Ready(view) => view.table.rows.clone(),
        Section::Unavailable { reason, .. } => panic!("section unavailable: {}", reason),
    }
}

/// Same rows as `JUICE_CSV`, with real date cells where the CSV has ISO dates.
fn write_juice_xlsx(path: &Path) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (col, header) in [
        "Category",
        "Date Ordered",
        "$ Sales",
        "Service Satisfaction Rating",
    ]
    .iter()
    .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    let rows: [(&str, Option<(u16, u8, u8)>, &str, Option<f64>); 5] = [
        ("Juice", Some((2024, 1, 2)), "$10.00", Some(3.0)),
        ("Juice", Some((2024, 1, 1)), "$5.00", Some(5.0)),
        ("Smoothie", Some((2024, 1, 2)), "$1,020.00", Some(5.0)),
        ("Smoothie", Some((2024, 1, 3)), "N/A", None),
        ("Juice", None, "$2.50", Some(4.0)),
    ];

    for (idx, (category, date, sales, rating)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *category).unwrap();
        match date {
            Some((y, m, d)) => {
                let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                sheet
                    .write_datetime_with_format(row, 1, &date, &date_format)
                    .unwrap();
            }
            None => {
                sheet.write_string(row, 1, "01/03/2024").unwrap();
            }
        }
        sheet.write_string(row, 2, *sales).unwrap();
        if let Some(rating) = rating {
            sheet.write_number(row, 3, *rating).unwrap();
        }
    }

    workbook.save(path).unwrap();
}

#[test]
fn test_csv_dashboard() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("juice.csv");
    fs::write(&path, JUICE_CSV).unwrap();

    let view = render_file(&path);
    assert_eq!(view.source, "juice.csv");
    assert_eq!(view.row_count, 5);
    assert_eq!(view.title, "Juice & Smoothie Sales Dashboard");

    assert_eq!(
        ready_rows(&view.category),
        vec![vec!["Smoothie", "1,020.00"], vec!["Juice", "17.50"]]
    );
    assert_eq!(
        ready_rows(&view.daily),
        vec![
            vec!["2024-01-01", "5.00"],
            vec!["2024-01-02", "1,030.00"],
            vec!["2024-01-03", "2.50"],
        ]
    );
    assert_eq!(
        ready_rows(&view.ratings),
        vec![vec!["3", "1"], vec!["4", "1"], vec!["5", "2"]]
    );

    // The N/A row is only excluded from the aggregates.
    assert_eq!(view.notes.len(), 1);
    assert!(view.notes[0].contains("$ Sales"));
    assert!(view
        .preview
        .tail
        .iter()
        .any(|row| row.iter().any(|cell| cell == "N/A")));
}

#[test]
fn test_spreadsheet_matches_csv() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("juice.csv");
    let xlsx_path = dir.path().join("juice.xlsx");
    fs::write(&csv_path, JUICE_CSV).unwrap();
    write_juice_xlsx(&xlsx_path);

    let from_csv = render_file(&csv_path);
    let from_xlsx = render_file(&xlsx_path);

    assert_eq!(from_xlsx.source, "juice.xlsx");
    assert_eq!(from_xlsx.row_count, from_csv.row_count);
    assert_eq!(from_xlsx.preview.columns, from_csv.preview.columns);
    assert_eq!(from_xlsx.category, from_csv.category);
    assert_eq!(from_xlsx.daily, from_csv.daily);
    assert_eq!(from_xlsx.ratings, from_csv.ratings);
}

#[test]
fn test_missing_rating_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_ratings.csv");
    fs::write(
        &path,
        "Category,Date Ordered,$ Sales\nJuice,2024-01-01,$4.00\n",
    )
    .unwrap();

    let view = render_file(&path);
    assert!(view.category.is_ready());
    assert!(view.daily.is_ready());
    assert!(matches!(
        &view.ratings,
        Section::Unavailable { reason, .. } if reason == "Missing column(s): Service Satisfaction Rating"
    ));
}

#[test]
fn test_config_file_remaps_columns() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("shop.csv");
    let config_path = dir.path().join("dashboard.json");
    fs::write(&data, "Kind,Amount\nTea,$3.00\nCoffee,$4.00\nTea,$2.00\n").unwrap();
    fs::write(
        &config_path,
        r#"{"title": "Shop", "preview_rows": 2, "columns": {"category": "Kind", "sales_raw": "Amount"}}"#,
    )
    .unwrap();

    let config = DashboardConfig::load(&config_path).unwrap();
    let dataset = DataLoader::load_path(&data).unwrap();
    let view = view::render(&dataset, &config).unwrap();

    assert_eq!(view.title, "Shop");
    assert_eq!(view.preview.head.len(), 2);
    assert_eq!(
        ready_rows(&view.category),
        vec![vec!["Tea", "5.00"], vec!["Coffee", "4.00"]]
    );
}

#[test]
fn test_json_report_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("juice.csv");
    fs::write(&path, JUICE_CSV).unwrap();

    let json = serde_json::to_value(render_file(&path)).unwrap();
    assert_eq!(json["category"]["status"], "ready");
    assert_eq!(json["category"]["chart"]["kind"], "bar");
    assert_eq!(json["daily"]["chart"]["kind"], "line");
    assert_eq!(json["ratings"]["table"]["rows"][2][1], "2");
}

#[test]
fn test_unreadable_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, b"definitely not a workbook").unwrap();
    assert!(DataLoader::load_path(&path).is_err());

    assert!(DataLoader::load_path(dir.path().join("missing.csv")).is_err());
}

fn png_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_export_writes_one_png_per_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("juice.csv");
    fs::write(&path, JUICE_CSV).unwrap();
    let out = dir.path().join("charts");

    let written = ChartRenderer::render_all(&render_file(&path), &out).unwrap();

    assert_eq!(
        png_names(&written),
        vec!["category.png", "daily.png", "ratings.png"]
    );
    for png in &written {
        assert!(png.starts_with(&out));
        assert!(fs::metadata(png).unwrap().len() > 0);
        assert_eq!(&fs::read(png).unwrap()[..4], b"\x89PNG");
    }
}

#[test]
fn test_export_skips_unavailable_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_ratings.csv");
    fs::write(
        &path,
        "Category,Date Ordered,$ Sales\nJuice,2024-01-01,$4.00\nSmoothie,2024-01-02,$6.00\n",
    )
    .unwrap();
    let out = dir.path().join("charts");

    let written = ChartRenderer::render_all(&render_file(&path), &out).unwrap();

    assert_eq!(png_names(&written), vec!["category.png", "daily.png"]);
    assert!(!out.join("ratings.png").exists());
}

#[test]
fn test_export_skips_empty_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("header_only.csv");
    fs::write(
        &path,
        "Category,Date Ordered,$ Sales,Service Satisfaction Rating\n",
    )
    .unwrap();
    let out = dir.path().join("charts");

    let view = render_file(&path);
    assert!(view.sections().iter().all(|s| s.is_ready()));

    let written = ChartRenderer::render_all(&view, &out).unwrap();
    assert!(written.is_empty());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
