use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::DashboardConfig;
use crate::data::loader::shared_table;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MovieDashApp {
    pub state: AppState,
}

impl MovieDashApp {
    /// Build the app from the process-wide table, loading it on first use.
    pub fn new(config: DashboardConfig) -> Self {
        let loaded = shared_table(&config.data_path);
        Self {
            state: AppState::new(config, loaded),
        }
    }
}

impl eframe::App for MovieDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Without data the dashboard has nothing to offer; show why and stop there.
        if !self.state.has_data() {
            egui::CentralPanel::default().show(ctx, |ui| {
                critical_error(ui, &self.state);
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, chart, results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::metrics_row(ui, &self.state);
            ui.separator();

            if self.state.show_stats {
                panels::extra_stats(ui, &self.state);
                ui.separator();
            }

            let chart_height = (ui.available_height() * 0.55).max(220.0);
            ui.allocate_ui(egui::vec2(ui.available_width(), chart_height), |ui| {
                plot::chart(ui, &self.state);
            });
            ui.separator();

            panels::results_table(ui, &self.state);
        });
    }
}

fn critical_error(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let reason = state
            .load_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("{} contains no movies", state.config.data_path.display()));
        ui.label(
            RichText::new(format!("Could not initialise the movie table.\n{reason}"))
                .color(Color32::RED)
                .size(18.0),
        );
    });
}
