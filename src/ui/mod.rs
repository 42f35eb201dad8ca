/// egui widgets: menu bar, channel selectors, catalog table and charts.
pub mod panels;
pub mod plot;
