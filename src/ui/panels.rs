use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::catalog::{FileId, SortDirection, SortKey};
use crate::data::model::{CumulativeChannel, RawChannel};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Rescan").clicked() {
                state.open_directory(state.data_dir.clone());
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} files in {}, {} selected",
            state.catalog.len(),
            state.data_dir.display(),
            state.selection.len()
        ));

        if !state.selection.is_empty() && ui.small_button("Clear selection").clicked() {
            state.clear_selection();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }

        let failures = &state.extraction.failures;
        if !failures.is_empty() {
            ui.separator();
            let details: Vec<String> = failures.iter().map(|f| f.error.to_string()).collect();
            let warning = format!("⚠ {} trace(s) unavailable", failures.len());
            ui.label(RichText::new(warning).color(Color32::RED))
                .on_hover_text(details.join("\n"));
        }
    });
}

// ---------------------------------------------------------------------------
// Channel selectors
// ---------------------------------------------------------------------------

pub fn raw_channel_combo(ui: &mut Ui, state: &mut AppState) {
    let current = state.raw_channel;
    egui::ComboBox::from_id_salt("raw_channel")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for channel in RawChannel::ALL {
                if ui
                    .selectable_label(current == channel, channel.column())
                    .clicked()
                {
                    state.set_raw_channel(channel);
                }
            }
        });
}

pub fn cumulative_channel_combo(ui: &mut Ui, state: &mut AppState) {
    let current = state.cumulative_channel;
    egui::ComboBox::from_id_salt("cumulative_channel")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for channel in CumulativeChannel::ALL {
                if ui
                    .selectable_label(current == channel, channel.column())
                    .clicked()
                {
                    state.set_cumulative_channel(channel);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Catalog table
// ---------------------------------------------------------------------------

const COLUMNS: [(SortKey, &str); 4] = [
    (SortKey::Id, "Cell id"),
    (SortKey::Filename, "Filename"),
    (SortKey::RowCount, "Number of rows"),
    (SortKey::MaxCycle, "Number of cycles"),
];

/// Render the file catalog with a selection checkbox per row. Clicking a
/// column header sorts by it.
pub fn catalog_table(ui: &mut Ui, state: &mut AppState) {
    if state.catalog.is_empty() {
        ui.label("No data files found.");
        return;
    }

    let order = state.table_order();
    let mut sort_clicked: Option<SortKey> = None;
    let mut toggled: Option<FileId> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(110.0))
        .header(20.0, |mut header| {
            header.col(|_ui| {});
            for (key, label) in COLUMNS {
                header.col(|ui| {
                    let arrow = match (state.sort_key == key, state.sort_direction) {
                        (false, _) => "",
                        (true, SortDirection::Ascending) => " ⬆",
                        (true, SortDirection::Descending) => " ⬇",
                    };
                    if ui.button(RichText::new(format!("{label}{arrow}")).strong()).clicked() {
                        sort_clicked = Some(key);
                    }
                });
            }
        })
        .body(|mut body| {
            for id in order {
                let Ok(file) = state.catalog.get(id) else {
                    continue;
                };
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let mut checked = state.is_selected(id);
                        if ui.checkbox(&mut checked, "").changed() {
                            toggled = Some(id);
                        }
                    });
                    row.col(|ui| {
                        ui.label(file.id.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&file.filename);
                    });
                    row.col(|ui| {
                        ui.label(file.row_count.to_string());
                    });
                    row.col(|ui| {
                        ui.label(file.max_cycle.map_or_else(String::new, |c| c.to_string()));
                    });
                });
            }
        });

    if let Some(key) = sort_clicked {
        state.sort_by(key);
    }
    if let Some(id) = toggled {
        state.toggle_selection(id);
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open test data folder")
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.open_directory(dir);
        log::info!(
            "Loaded {} data files from {}",
            state.catalog.len(),
            state.data_dir.display()
        );
    }
}
