//! Control Panel Widget
//! Left side panel with the dataset picker, export button and status.

use crate::config::ColumnMapping;
use egui::{Color32, RichText};

const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn color(self) -> Color32 {
        match self {
            StatusKind::Info => Color32::GRAY,
            StatusKind::Success => OK_COLOR,
            StatusKind::Error => ERROR_COLOR,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub file_name: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub status: String,
    pub status_kind: StatusKind,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_name: None,
            row_count: 0,
            column_count: 0,
            status: "Upload a CSV or spreadsheet to get started.".to_string(),
            status_kind: StatusKind::Info,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful upload
    pub fn set_loaded(&mut self, file_name: &str, rows: usize, columns: usize) {
        self.file_name = Some(file_name.to_string());
        self.row_count = rows;
        self.column_count = columns;
        self.export_enabled = true;
        self.set_status(StatusKind::Success, "File uploaded successfully!");
    }

    /// Forget the current upload after a failed one
    pub fn clear_dataset(&mut self) {
        self.file_name = None;
        self.row_count = 0;
        self.column_count = 0;
        self.export_enabled = false;
    }

    pub fn set_status(&mut self, kind: StatusKind, status: &str) {
        self.status_kind = kind;
        self.status = status.to_string();
    }

    /// Success or error message for the top of the dashboard; none for info.
    pub fn banner(&self) -> Option<(&str, Color32)> {
        match self.status_kind {
            StatusKind::Info => None,
            kind => Some((self.status.as_str(), kind.color())),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, columns: &ColumnMapping) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Sales Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (text, color) = match &self.file_name {
                        Some(name) => (name.as_str(), Color32::WHITE),
                        None => ("No file selected", Color32::GRAY),
                    };
                    ui.label(RichText::new(text).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open Dataset").clicked() {
                            action = ControlPanelAction::OpenDataset;
                        }
                    });
                });

                if self.file_name.is_some() {
                    ui.label(
                        RichText::new(format!(
                            "{} rows, {} columns",
                            self.row_count, self.column_count
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Column Mapping Section =====
        ui.label(RichText::new("🔧 Column Mapping").size(14.0).strong());
        ui.add_space(8.0);

        egui::Grid::new("column_mapping")
            .num_columns(2)
            .spacing([10.0, 4.0])
            .show(ui, |ui| {
                for (role, name) in [
                    ("Category", &columns.category),
                    ("Date", &columns.date),
                    ("Sales (raw)", &columns.sales_raw),
                    ("Sales", &columns.sales),
                    ("Rating", &columns.rating),
                ] {
                    ui.label(RichText::new(role).color(Color32::GRAY));
                    ui.label(name);
                    ui.end_row();
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(
            RichText::new(&self.status)
                .size(11.0)
                .color(self.status_kind.color()),
        );

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenDataset,
    ExportCharts,
}
