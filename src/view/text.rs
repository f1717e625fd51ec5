//! Plain-text rendering of the view model for the headless report.

use super::{Section, SectionView, ViewModel};
use std::fmt;

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Source: {} ({} rows)", self.source, self.row_count)?;

        writeln!(f)?;
        writeln!(f, "== First Few Rows ==")?;
        write_table(f, &self.preview.columns, &self.preview.head)?;
        writeln!(f)?;
        writeln!(f, "== Last Few Rows ==")?;
        write_table(f, &self.preview.columns, &self.preview.tail)?;

        for note in &self.notes {
            writeln!(f, "Note: {}", note)?;
        }

        for section in self.sections() {
            writeln!(f)?;
            writeln!(f, "== {} ==", section.tab())?;
            match section {
                Section::Ready(view) => write_section(f, view)?,
                Section::Unavailable { reason, .. } => writeln!(f, "Unavailable: {}", reason)?,
            }
        }
        Ok(())
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, view: &SectionView) -> fmt::Result {
    writeln!(f, "{}", view.heading)?;
    writeln!(f, "{}", view.caption)?;
    write_table(f, &view.table.headers, &view.table.rows)?;

    for (label, value) in &view.summary {
        writeln!(f, "{}: {}", label, value)?;
    }

    writeln!(f, "Interpretation")?;
    for line in &view.interpretation {
        writeln!(f, "- {}", line)?;
    }
    Ok(())
}

/// Left-aligned columns separated by ` | `.
fn write_table(
    f: &mut fmt::Formatter<'_>,
    headers: &[String],
    rows: &[Vec<String>],
) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    write_row(f, headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(f, "{}", rule.join("-+-"))?;
    for row in rows {
        write_row(f, row, &widths)?;
    }
    Ok(())
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}
