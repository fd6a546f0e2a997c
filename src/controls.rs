//! Control panel: identifier form, submit control, result and error
//! display.

use chrono::{DateTime, TimeZone};
use eframe::egui;

use crate::app::App;
use crate::prediction::{PredictionResult, RiskLevel};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(248, 113, 113);
const RISK_HIGH_COLOR: egui::Color32 = egui::Color32::from_rgb(248, 80, 80);
const RISK_MEDIUM_COLOR: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);
const RISK_LOW_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);

impl App {
    pub(crate) fn show_control_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("OrbitGuard");
        ui.label("Satellite Collision Risk Predictor");
        ui.separator();

        ui.label("NORAD ID 1");
        ui.text_edit_singleline(&mut self.id1);
        ui.add_space(4.0);
        ui.label("NORAD ID 2");
        ui.text_edit_singleline(&mut self.id2);
        ui.add_space(10.0);

        let loading = self.state.is_loading();
        let ids_present = !self.id1.trim().is_empty() && !self.id2.trim().is_empty();
        let label = if loading { "Analyzing Orbits..." } else { "Analyze Collision Risk" };
        ui.horizontal(|ui| {
            if ui.add_enabled(!loading && ids_present, egui::Button::new(label)).clicked() {
                self.submit(ctx);
            }
            if loading {
                ui.spinner();
            }
        });

        if let Some(message) = self.state.error() {
            ui.add_space(10.0);
            ui.colored_label(ERROR_COLOR, message);
        }

        if let Some(result) = self.state.result().cloned() {
            ui.add_space(10.0);
            ui.separator();
            ui.label(egui::RichText::new("Analysis Results").strong());
            ui.add_space(4.0);
            self.show_result(ui, &result);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.label(egui::RichText::new(version_line()).small().weak());
        });
    }

    fn show_result(&self, ui: &mut egui::Ui, result: &PredictionResult) {
        egui::Grid::new("analysis_results")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.label("Minimum Distance");
                ui.label(format_distance_km(result.min_distance_km));
                ui.end_row();

                ui.label("Risk Level");
                ui.colored_label(
                    risk_color(&result.risk_level),
                    egui::RichText::new(result.risk_level.display()).strong(),
                );
                ui.end_row();

                ui.label("Risk Score");
                ui.label(format_score(result.collision_probability_score));
                ui.end_row();

                ui.label("Closest Approach");
                ui.label(format_clock(
                    &result.time_of_closest_approach.with_timezone(&chrono::Local),
                ));
                ui.end_row();
            });
    }
}

pub(crate) fn risk_color(level: &RiskLevel) -> egui::Color32 {
    match level {
        RiskLevel::High => RISK_HIGH_COLOR,
        RiskLevel::Medium => RISK_MEDIUM_COLOR,
        RiskLevel::Low => RISK_LOW_COLOR,
        RiskLevel::Unknown(_) => egui::Color32::GRAY,
    }
}

pub(crate) fn format_distance_km(km: f64) -> String {
    format!("{km:.2} km")
}

pub(crate) fn format_score(score: f64) -> String {
    format!("{score} / 100")
}

/// Wall-clock rendering of the closest-approach instant in whatever zone
/// the caller converted it to (the UI uses local time).
pub(crate) fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M").to_string()
}

fn version_line() -> String {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        format!("orbitguard {}", env!("CARGO_PKG_VERSION"))
    } else {
        format!("orbitguard {} ({})", env!("CARGO_PKG_VERSION"), hash)
    }
}
