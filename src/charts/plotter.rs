//! Chart Plotter Module
//! Chart descriptions shared by both renderers, and interactive drawing
//! with egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};
use std::ops::RangeInclusive;

pub const TREND_COLOR: (u8, u8, u8) = (0, 0, 255); // Blue
pub const MONTH_COLOR: (u8, u8, u8) = (0, 128, 0); // Green
pub const PRODUCT_COLOR: (u8, u8, u8) = (128, 0, 128); // Purple

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Line with point markers, categories along x
    Line,
    /// Vertical bars, categories along x
    Bar,
    /// Horizontal bars, categories along y with the first entry on top
    HorizontalBar,
}

/// A labelled series plus its fixed display parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Plot id and exported file name (without extension)
    pub file_stem: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub kind: ChartKind,
    pub color: (u8, u8, u8),
    /// Exported image size in pixels
    pub size: (u32, u32),
    pub points: Vec<(String, f64)>,
}

impl ChartData {
    /// Position of entry `i` along the category axis.
    pub fn category_position(&self, i: usize) -> usize {
        match self.kind {
            ChartKind::HorizontalBar => self.points.len() - 1 - i,
            ChartKind::Line | ChartKind::Bar => i,
        }
    }

    /// Value axis range, always including zero with headroom above the peak.
    pub fn value_range(&self) -> (f64, f64) {
        let max = self
            .points
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = self
            .points
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::INFINITY, f64::min);

        let upper = if max.is_finite() && max > 0.0 { max * 1.1 } else { 1.0 };
        let lower = if min.is_finite() && min < 0.0 { min * 1.1 } else { 0.0 };
        (lower, upper)
    }
}

/// Draws charts inside an egui panel.
pub struct ChartPlotter;

impl ChartPlotter {
    fn color32(chart: &ChartData) -> Color32 {
        let (r, g, b) = chart.color;
        Color32::from_rgb(r, g, b)
    }

    /// Label lookup for integer grid marks on the category axis.
    fn category_formatter(
        chart: &ChartData,
    ) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
        let mut labels = vec![String::new(); chart.points.len()];
        for (i, (label, _)) in chart.points.iter().enumerate() {
            labels[chart.category_position(i)] = label.clone();
        }

        move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Draw a chart at the given height.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        let color = Self::color32(chart);

        let mut plot = Plot::new(chart.file_stem)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart.x_label)
            .y_axis_label(chart.y_label);
        plot = match chart.kind {
            ChartKind::HorizontalBar => plot.y_axis_formatter(Self::category_formatter(chart)),
            ChartKind::Line | ChartKind::Bar => {
                plot.x_axis_formatter(Self::category_formatter(chart))
            }
        };

        plot.show(ui, |plot_ui| match chart.kind {
            ChartKind::Line => {
                let points: Vec<[f64; 2]> = chart
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| [i as f64, *v])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(color)
                        .width(2.0)
                        .name(chart.y_label),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).radius(4.0).color(color));
            }
            ChartKind::Bar | ChartKind::HorizontalBar => {
                let bars: Vec<Bar> = chart
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, (label, v))| {
                        Bar::new(chart.category_position(i) as f64, *v)
                            .name(label)
                            .width(0.7)
                    })
                    .collect();

                let mut bar_chart = BarChart::new(bars).color(color).name(chart.y_label);
                if chart.kind == ChartKind::HorizontalBar {
                    bar_chart = bar_chart.horizontal();
                }
                plot_ui.bar_chart(bar_chart);
            }
        });
    }
}
