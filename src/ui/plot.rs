use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::series::SeriesSet;

// ---------------------------------------------------------------------------
// Comparison charts (central panel)
// ---------------------------------------------------------------------------

/// Draw one chart with a trace per series, or `placeholder` when there is
/// nothing to draw.
pub fn series_plot(ui: &mut Ui, id: &str, set: &SeriesSet, line_width: f32, placeholder: &str) {
    if set.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(placeholder);
        });
        return;
    }

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(set.x_label)
        .y_axis_label(set.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &set.series {
                let points: PlotPoints = series
                    .x
                    .iter()
                    .zip(series.y.iter())
                    .map(|(&xi, &yi)| [xi, yi])
                    .collect();

                let line = Line::new(points)
                    .name(&series.name)
                    .color(series.color)
                    .width(line_width);

                plot_ui.line(line);
            }
        });
}
