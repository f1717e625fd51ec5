//! Chart Plotter Module
//! Draws section charts interactively using egui_plot.

use crate::view::{ChartKind, ChartSpec};
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

/// Fill for bar charts
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// Stroke for line charts and their markers
pub const LINE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Most x tick labels drawn before thinning kicks in
const MAX_X_LABELS: usize = 12;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a bar or line chart for one section.
    /// X-axis: one slot per entry labelled with its key, Y-axis: value
    pub fn draw_chart(ui: &mut egui::Ui, id: &str, spec: &ChartSpec, height: f32) {
        let labels: Vec<String> = spec.points.iter().map(|p| p.label.clone()).collect();
        let count = labels.len();
        let step = Self::label_step(count);

        Plot::new(format!("chart_{}", id))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .include_y(0.0)
            // One grid mark per labelled entry
            .x_grid_spacer(move |_input| {
                (0..count)
                    .step_by(step)
                    .map(|idx| GridMark {
                        value: idx as f64,
                        step_size: step as f64,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| Self::tick_label(&labels, mark.value))
            .show(ui, |plot_ui| match spec.kind {
                ChartKind::Bar => plot_ui.bar_chart(Self::bar_chart(spec)),
                ChartKind::Line => {
                    let points: Vec<[f64; 2]> = Self::positions(spec);
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(LINE_COLOR)
                            .width(2.0)
                            .name(&spec.title),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(4.0)
                            .color(LINE_COLOR),
                    );
                }
            });
    }

    fn bar_chart(spec: &ChartSpec) -> BarChart {
        let bars = spec
            .points
            .iter()
            .enumerate()
            .map(|(idx, point)| Bar::new(idx as f64, point.value).name(&point.label).width(0.6))
            .collect();

        BarChart::new(bars).color(BAR_COLOR).name(&spec.title)
    }

    fn positions(spec: &ChartSpec) -> Vec<[f64; 2]> {
        spec.points
            .iter()
            .enumerate()
            .map(|(idx, point)| [idx as f64, point.value])
            .collect()
    }

    /// Show every n-th label so long date axes stay readable.
    fn label_step(count: usize) -> usize {
        count.div_ceil(MAX_X_LABELS).max(1)
    }

    /// Label for an x grid mark; blank between entries.
    fn tick_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}
