//! Charts module - interactive and static chart drawing

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, BAR_COLOR, LINE_COLOR};
pub use renderer::{ChartRenderer, RenderError, DEFAULT_HEIGHT, DEFAULT_WIDTH};
