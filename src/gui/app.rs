//! Sales Insights Viewer Window
//! Summary panel on the left, charts on the right.

use crate::charts::ChartData;
use crate::gui::{ChartViewer, SummaryPanel};
use crate::pipeline::AnalysisReport;
use egui::SidePanel;

/// Main application window.
pub struct SalesViewerApp {
    summary: SummaryPanel,
    chart_viewer: ChartViewer,
}

impl SalesViewerApp {
    pub fn new(source: String, report: &AnalysisReport, charts: Vec<ChartData>) -> Self {
        Self {
            summary: SummaryPanel::new(source, report),
            chart_viewer: ChartViewer::new(charts),
        }
    }

    /// Open the window and block until it is closed.
    pub fn run(self) -> eframe::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1300.0, 900.0])
                .with_min_inner_size([900.0, 600.0])
                .with_title("Sales Insights"),
            ..Default::default()
        };

        eframe::run_native(
            "Sales Insights",
            options,
            Box::new(|_cc| Ok(Box::new(self))),
        )
    }
}

impl eframe::App for SalesViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("summary_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.summary.show(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
