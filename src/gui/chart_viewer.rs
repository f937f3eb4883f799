//! Chart Viewer Widget
//! Scrollable panel showing one card per chart.

use crate::charts::{ChartData, ChartPlotter};
use egui::{RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const PLOT_HEIGHT: f32 = 360.0;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: Vec<ChartData>,
}

impl ChartViewer {
    pub fn new(charts: Vec<ChartData>) -> Self {
        Self { charts }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for chart in &self.charts {
                    Self::draw_chart_card(ui, chart);
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartData) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(chart.title).size(18.0).strong());
                    ui.add_space(8.0);
                    ChartPlotter::draw_chart(ui, chart, PLOT_HEIGHT);
                });
            });
    }
}
