use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CycleDashApp {
    pub state: AppState,
}

impl CycleDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CycleDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: file catalog ----
        egui::TopBottomPanel::bottom("catalog_panel")
            .default_height(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Data files");
                ui.separator();
                panels::catalog_table(ui, &mut self.state);
            });

        // ---- Central panel: raw and cycle charts side by side ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let raw_width = self.state.config.raw_line_width;
            let cycle_width = self.state.config.cycle_line_width;
            let placeholder = self.state.chart_placeholder();

            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].vertical_centered(|ui: &mut Ui| ui.strong("Test raw data"));
                panels::raw_channel_combo(&mut cols[0], &mut self.state);
                plot::series_plot(
                    &mut cols[0],
                    "raw_plot",
                    &self.state.extraction.raw,
                    raw_width,
                    placeholder,
                );

                cols[1].vertical_centered(|ui: &mut Ui| ui.strong("Test cycle data"));
                panels::cumulative_channel_combo(&mut cols[1], &mut self.state);
                plot::series_plot(
                    &mut cols[1],
                    "cycle_plot",
                    &self.state.extraction.cycle,
                    cycle_width,
                    placeholder,
                );
            });
        });
    }
}
