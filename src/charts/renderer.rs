//! Static Chart Renderer
//! Writes each chart as a PNG with plotters.
//!
//! Layout per chart: centered title, rotated category labels on the
//! category axis, value axis starting at zero.

use crate::charts::{ChartData, ChartKind};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const TITLE_FONT_SIZE: u32 = 24;
const LABEL_FONT_SIZE: u32 = 13;
const BAR_MARGIN: u32 = 6;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

/// Label of a category slot, or empty between slots.
fn segment_label(value: &SegmentValue<u32>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

/// Labels indexed by category position.
fn positioned_labels(chart: &ChartData) -> Vec<String> {
    let mut labels = vec![String::new(); chart.points.len()];
    for (i, (label, _)) in chart.points.iter().enumerate() {
        labels[chart.category_position(i)] = label.clone();
    }
    labels
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` into `dir`. Returns `None` when there is nothing to draw.
    pub fn render_png(chart: &ChartData, dir: &Path) -> Result<Option<PathBuf>, RenderError> {
        if chart.points.is_empty() {
            debug!(chart = chart.file_stem, "empty series, nothing to render");
            return Ok(None);
        }

        let path = dir.join(format!("{}.png", chart.file_stem));
        {
            let root = BitMapBackend::new(&path, chart.size).into_drawing_area();
            Self::draw(&root, chart)?;
            root.present()?;
        }

        info!("Saved {}", path.display());
        Ok(Some(path))
    }

    /// Draw `chart` onto any plotters drawing area.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)?;
        match chart.kind {
            ChartKind::Line => Self::draw_line(root, chart),
            ChartKind::Bar => Self::draw_vertical_bars(root, chart),
            ChartKind::HorizontalBar => Self::draw_horizontal_bars(root, chart),
        }
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        let (r, g, b) = chart.color;
        let color = RGBColor(r, g, b);
        let labels = positioned_labels(chart);
        let (y_min, y_max) = chart.value_range();

        let mut cc = ChartBuilder::on(root)
            .caption(chart.title, ("sans-serif", TITLE_FONT_SIZE))
            .margin(15)
            .x_label_area_size(80)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), y_min..y_max)?;

        cc.configure_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_labels(labels.len() + 1)
            .x_label_formatter(&|v| segment_label(v, &labels))
            .x_label_style(
                ("sans-serif", LABEL_FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .draw()?;

        let series: Vec<(SegmentValue<u32>, f64)> = chart
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (SegmentValue::CenterOf(chart.category_position(i) as u32), *v))
            .collect();

        cc.draw_series(LineSeries::new(series, color.stroke_width(2)).point_size(4))?;
        Ok(())
    }

    fn draw_vertical_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        let (r, g, b) = chart.color;
        let color = RGBColor(r, g, b);
        let labels = positioned_labels(chart);
        let (y_min, y_max) = chart.value_range();

        let mut cc = ChartBuilder::on(root)
            .caption(chart.title, ("sans-serif", TITLE_FONT_SIZE))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), y_min..y_max)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_labels(labels.len() + 1)
            .x_label_formatter(&|v| segment_label(v, &labels))
            .draw()?;

        cc.draw_series(
            Histogram::vertical(&cc)
                .style(color.filled())
                .margin(BAR_MARGIN)
                .data(
                    chart
                        .points
                        .iter()
                        .enumerate()
                        .map(|(i, (_, v))| (chart.category_position(i) as u32, *v)),
                ),
        )?;
        Ok(())
    }

    fn draw_horizontal_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        let (r, g, b) = chart.color;
        let color = RGBColor(r, g, b);
        let labels = positioned_labels(chart);
        let (x_min, x_max) = chart.value_range();

        let mut cc = ChartBuilder::on(root)
            .caption(chart.title, ("sans-serif", TITLE_FONT_SIZE))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(110)
            .build_cartesian_2d(x_min..x_max, (0u32..labels.len() as u32).into_segmented())?;

        cc.configure_mesh()
            .disable_y_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .y_labels(labels.len() + 1)
            .y_label_formatter(&|v| segment_label(v, &labels))
            .draw()?;

        cc.draw_series(
            Histogram::horizontal(&cc)
                .style(color.filled())
                .margin(BAR_MARGIN)
                .data(
                    chart
                        .points
                        .iter()
                        .enumerate()
                        .map(|(i, (_, v))| (chart.category_position(i) as u32, *v)),
                ),
        )?;
        Ok(())
    }
}
