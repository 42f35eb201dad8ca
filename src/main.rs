mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CycleDashApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Data files are listed from the directory the dashboard is started in.
    let data_dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let state = AppState::open(data_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Electrical Test Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(CycleDashApp::new(state)))),
    )
}
