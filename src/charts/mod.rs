//! Charts module - Chart descriptions and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartKind, ChartPlotter, MONTH_COLOR, PRODUCT_COLOR, TREND_COLOR};
pub use renderer::StaticChartRenderer;
