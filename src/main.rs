mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::MovieDashApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    log::info!("Using movie data from {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "IMDB 5000 Movie Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(MovieDashApp::new(config)))),
    )
}
