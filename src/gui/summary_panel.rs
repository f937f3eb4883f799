//! Summary Panel Widget
//! Left side panel with dataset facts and the statistics summary.

use crate::pipeline::AnalysisReport;
use egui::{Color32, RichText};

/// Read-only summary of a finished analysis.
pub struct SummaryPanel {
    source: String,
    raw_shape: (usize, usize),
    cleaned_rows: usize,
    cleaning: Vec<String>,
    stats: Vec<(String, [(&'static str, String); 4])>,
    skipped: Vec<(&'static str, String)>,
}

impl SummaryPanel {
    pub fn new(source: String, report: &AnalysisReport) -> Self {
        let stats = report
            .stats
            .columns
            .iter()
            .map(|(name, s)| {
                (
                    name.clone(),
                    [
                        ("Mean", format!("{:?}", s.mean)),
                        ("Median", format!("{:?}", s.median)),
                        ("Standard Deviation", format!("{:?}", s.std)),
                        ("Mode", s.mode_text()),
                    ],
                )
            })
            .collect();

        let mut cleaning: Vec<String> = report
            .filled
            .iter()
            .map(|(column, count)| format!("{} {} values filled with the median", count, column))
            .collect();
        if report.rows_dropped > 0 {
            cleaning.push(format!("{} incomplete rows dropped", report.rows_dropped));
        }
        if report.unparsed_dates > 0 {
            cleaning.push(format!(
                "{} rows without a readable order date left out of the timeline",
                report.unparsed_dates
            ));
        }

        Self {
            source,
            raw_shape: report.raw_shape,
            cleaned_rows: report.cleaned_rows,
            cleaning,
            stats,
            skipped: report.skipped_sections(),
        }
    }

    /// Draw the panel
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Sales Insights")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.label(RichText::new(&self.source).size(12.0));
        ui.label(format!(
            "{} rows x {} columns loaded",
            self.raw_shape.0, self.raw_shape.1
        ));
        ui.label(format!("{} rows after cleaning", self.cleaned_rows));
        for line in &self.cleaning {
            ui.label(RichText::new(line).size(12.0).weak());
        }
        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("📈 Statistics").size(14.0).strong());
        for (name, values) in &self.stats {
            ui.add_space(5.0);
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(name).strong());
                    egui::Grid::new(format!("stats_{}", name))
                        .num_columns(2)
                        .show(ui, |ui| {
                            for (label, value) in values {
                                ui.label(*label);
                                ui.label(value);
                                ui.end_row();
                            }
                        });
                });
        }

        if !self.skipped.is_empty() {
            ui.add_space(10.0);
            ui.separator();
            for (chart, column) in &self.skipped {
                ui.label(
                    RichText::new(format!("⚠ {} skipped: no {} column", chart, column))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        }
    }
}
