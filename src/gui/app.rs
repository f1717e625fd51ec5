//! Sales Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::charts::ChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset, SPREADSHEET_EXTENSIONS};
use crate::gui::{ControlPanel, ControlPanelAction, SectionViewer, StatusKind};
use crate::view::{self, ViewModel};
use egui::{Color32, RichText, SidePanel};
use log::{error, info};
use std::path::Path;

/// One uploaded dataset and its rendered dashboard.
struct Upload {
    dataset: Dataset,
    /// `None` when rendering failed; the reason is in the status line
    view: Option<ViewModel>,
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    section_viewer: SectionViewer,
    upload: Option<Upload>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            control_panel: ControlPanel::new(),
            section_viewer: SectionViewer::new(),
            upload: None,
        }
    }

    /// Handle dataset selection
    fn handle_open_dataset(&mut self) {
        let mut extensions = vec!["csv"];
        extensions.extend(SPREADSHEET_EXTENSIONS);

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Sales data", &extensions)
            .add_filter("CSV Files", &["csv"])
            .add_filter("Spreadsheets", &SPREADSHEET_EXTENSIONS)
            .pick_file()
        {
            self.open_dataset(&path);
        }
    }

    /// Load and render a file, replacing the current upload
    fn open_dataset(&mut self, path: &Path) {
        let dataset = match DataLoader::load_path(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.upload = None;
                self.control_panel.clear_dataset();
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Error loading file: {}", e));
                return;
            }
        };

        self.control_panel.set_loaded(
            dataset.source_name(),
            dataset.row_count(),
            dataset.columns().len(),
        );
        self.section_viewer.reset();

        let view = match view::render(&dataset, &self.config) {
            Ok(view) => Some(view),
            Err(e) => {
                error!("Failed to render {}: {}", dataset.source_name(), e);
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Error: {}", e));
                None
            }
        };
        self.control_panel.export_enabled = view.is_some();
        self.upload = Some(Upload { dataset, view });
    }

    /// Handle chart export - write one PNG per available section
    fn handle_export_charts(&mut self) {
        let Some(view) = self.upload.as_ref().and_then(|u| u.view.as_ref()) else {
            self.control_panel
                .set_status(StatusKind::Error, "No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match ChartRenderer::render_all(view, &dir) {
            Ok(written) if written.is_empty() => {
                self.control_panel
                    .set_status(StatusKind::Info, "No charts to export");
            }
            Ok(written) => {
                info!("Exported charts: {:?}", written);
                self.control_panel.set_status(
                    StatusKind::Success,
                    &format!("Exported {} chart(s) to {}", written.len(), dir.display()),
                );
            }
            Err(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.config.columns);

                    match action {
                        ControlPanelAction::OpenDataset => self.handle_open_dataset(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        let banner = self.control_panel.banner();
        egui::CentralPanel::default().show(ctx, |ui| match &self.upload {
            Some(Upload {
                view: Some(view), ..
            }) => self.section_viewer.show(ui, view, banner),
            Some(Upload { dataset, view: None }) => {
                ui.centered_and_justified(|ui| {
                    let (message, color) = banner.unwrap_or(("", Color32::GRAY));
                    ui.label(
                        RichText::new(format!(
                            "Could not build the dashboard for {}\n{}",
                            dataset.source_name(),
                            message
                        ))
                        .size(18.0)
                        .color(color),
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(&self.control_panel.status)
                            .size(20.0)
                            .color(self.control_panel.status_kind.color()),
                    );
                });
            }
        });
    }
}
