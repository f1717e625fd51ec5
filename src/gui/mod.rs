//! GUI module - User interface components

mod app;
mod control_panel;
mod section_viewer;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, StatusKind};
pub use section_viewer::SectionViewer;
