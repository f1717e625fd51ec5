//! Section Viewer Widget
//! Central panel: dataset preview plus one tab per dashboard question.

use crate::charts::ChartPlotter;
use crate::view::{Section, SectionView, ViewModel};
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 380.0;
const NOTE_COLOR: Color32 = Color32::from_rgb(255, 193, 7);
const UNAVAILABLE_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable view of a rendered dashboard.
#[derive(Default)]
pub struct SectionViewer {
    /// Index into `ViewModel::sections()`
    pub active_tab: usize,
}

impl SectionViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.active_tab = 0;
    }

    /// Draw the whole dashboard for one upload, with an optional status banner
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        view: &ViewModel,
        banner: Option<(&str, Color32)>,
    ) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(&view.title).size(26.0).strong());
                ui.add_space(10.0);

                if let Some((message, color)) = banner {
                    Self::draw_banner(ui, message, color);
                    ui.add_space(10.0);
                }

                ui.label(RichText::new("First Few Rows").size(16.0).strong());
                Self::draw_grid(ui, "preview_head", &view.preview.columns, &view.preview.head);
                ui.add_space(8.0);
                ui.label(RichText::new("Last Few Rows").size(16.0).strong());
                Self::draw_grid(ui, "preview_tail", &view.preview.columns, &view.preview.tail);

                for note in &view.notes {
                    ui.label(RichText::new(format!("⚠ {}", note)).color(NOTE_COLOR));
                }

                ui.add_space(15.0);
                ui.separator();

                let sections = view.sections();
                ui.horizontal(|ui| {
                    for (idx, section) in sections.iter().enumerate() {
                        ui.selectable_value(&mut self.active_tab, idx, section.tab());
                    }
                });
                ui.separator();
                ui.add_space(8.0);

                match sections.get(self.active_tab) {
                    Some(Section::Ready(section)) => Self::draw_section(ui, section),
                    Some(Section::Unavailable { reason, .. }) => {
                        ui.label(
                            RichText::new(format!("This section is unavailable. {}", reason))
                                .color(UNAVAILABLE_COLOR),
                        );
                    }
                    None => {}
                }
            });
    }

    fn draw_section(ui: &mut egui::Ui, section: &SectionView) {
        ui.label(RichText::new(&section.heading).size(20.0).strong());
        ui.add_space(5.0);
        ui.label(&section.caption);
        Self::draw_grid(ui, &section.tab, &section.table.headers, &section.table.rows);

        if !section.summary.is_empty() {
            ui.add_space(5.0);
            ui.horizontal_wrapped(|ui| {
                for (label, value) in &section.summary {
                    ui.label(RichText::new(format!("{}:", label)).color(Color32::GRAY));
                    ui.label(RichText::new(value).strong());
                    ui.add_space(12.0);
                }
            });
        }

        ui.add_space(10.0);
        ui.label(RichText::new(&section.chart.title).size(14.0).strong());
        ChartPlotter::draw_chart(ui, &section.tab, &section.chart, CHART_HEIGHT);

        ui.add_space(10.0);
        ui.label(RichText::new("Interpretation").size(16.0).strong());
        for line in &section.interpretation {
            ui.label(format!("• {}", line));
        }
    }

    fn draw_banner(ui: &mut egui::Ui, message: &str, color: Color32) {
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.5, color))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(message).size(14.0).color(color));
            });
    }

    /// Striped grid with a bold header row
    fn draw_grid(ui: &mut egui::Ui, id: &str, headers: &[String], rows: &[Vec<String>]) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal()
                    .id_salt(format!("{}_scroll", id))
                    .show(ui, |ui| {
                        egui::Grid::new(id)
                            .num_columns(headers.len())
                            .spacing([20.0, 4.0])
                            .striped(true)
                            .show(ui, |ui| {
                                for header in headers {
                                    ui.label(RichText::new(header).strong());
                                }
                                ui.end_row();

                                for row in rows {
                                    for cell in row {
                                        ui.label(cell);
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
