//! Static Chart Renderer
//! Writes section charts to PNG files with plotters.
//!
//! Layout per image:
//! 1. Title centered on top
//! 2. Bars (category, rating) or a line with markers (daily) on one slot per entry
//! 3. X tick labels under each slot, rotated 90° for date axes

use crate::view::{ChartKind, ChartSpec, Section, ViewModel};
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 700;

// Colors
const BAR_FILL: RGBColor = RGBColor(52, 152, 219);
const LINE_STROKE: RGBColor = RGBColor(231, 76, 60);

/// File stem for each section, in tab order.
const FILE_STEMS: [&str; 3] = ["category", "daily", "ratings"];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Chart '{0}' has no entries")]
    NoData(String),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(err.to_string())
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render every available section chart into `dir`.
    ///
    /// Sections that are unavailable or have no entries are skipped.
    /// Returns the written file paths.
    pub fn render_all(view: &ViewModel, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut written = Vec::new();
        for (section, stem) in view.sections().into_iter().zip(FILE_STEMS) {
            let Section::Ready(section_view) = section else {
                debug!("Not exporting '{}': section unavailable", section.tab());
                continue;
            };
            if section_view.chart.points.is_empty() {
                debug!("Not exporting '{}': no entries", section.tab());
                continue;
            }

            let path = dir.join(format!("{}.png", stem));
            Self::render_png(&section_view.chart, &path, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
            written.push(path);
        }

        info!("Exported {} chart(s) to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Render one chart to a PNG file.
    pub fn render_png(
        spec: &ChartSpec,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if spec.points.is_empty() {
            return Err(RenderError::NoData(spec.title.clone()));
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (y_min, y_max) = Self::value_range(spec);
        let count = spec.points.len();
        let label_area = if spec.rotate_labels { 120 } else { 60 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(label_area)
            .y_label_area_size(90)
            .build_cartesian_2d((0..count).into_segmented(), y_min..y_max)
            .map_err(draw_err)?;

        let x_font = if spec.rotate_labels {
            ("sans-serif", 14).into_font().transform(FontTransform::Rotate90)
        } else {
            ("sans-serif", 14).into_font()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => spec
                    .points
                    .get(*idx)
                    .map(|p| p.label.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .x_label_style(x_font)
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(draw_err)?;

        match spec.kind {
            ChartKind::Bar => {
                chart
                    .draw_series(
                        Histogram::vertical(&chart)
                            .style(BAR_FILL.filled())
                            .margin(12)
                            .data(
                                spec.points
                                    .iter()
                                    .enumerate()
                                    .map(|(idx, p)| (SegmentValue::Exact(idx), p.value)),
                            ),
                    )
                    .map_err(draw_err)?;
            }
            ChartKind::Line => {
                let points: Vec<(SegmentValue<usize>, f64)> = spec
                    .points
                    .iter()
                    .enumerate()
                    .map(|(idx, p)| (SegmentValue::CenterOf(idx), p.value))
                    .collect();

                chart
                    .draw_series(LineSeries::new(
                        points.clone(),
                        LINE_STROKE.stroke_width(2),
                    ))
                    .map_err(draw_err)?;
                chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|point| Circle::new(point, 5, LINE_STROKE.filled())),
                    )
                    .map_err(draw_err)?;
            }
        }

        root.present().map_err(draw_err)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Y range with headroom above the tallest value; always includes zero.
    fn value_range(spec: &ChartSpec) -> (f64, f64) {
        let max = spec.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        let min = spec.points.iter().map(|p| p.value).fold(0.0_f64, f64::min);

        let top = if max > 0.0 { max * 1.1 } else { 1.0 };
        let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
        (bottom, top)
    }
}
