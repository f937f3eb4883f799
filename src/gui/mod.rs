//! GUI module - Interactive chart window

mod app;
mod chart_viewer;
mod summary_panel;

pub use app::SalesViewerApp;
pub use chart_viewer::ChartViewer;
pub use summary_panel::SummaryPanel;
