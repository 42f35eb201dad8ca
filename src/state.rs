use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;
use crate::data::catalog::{Catalog, FileId, SortDirection, SortKey, build_catalog};
use crate::data::loader::discover_files;
use crate::data::model::{CumulativeChannel, RawChannel};
use crate::data::series::{Extraction, SeriesSettings, extract_series};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory the catalog was built from.
    pub data_dir: PathBuf,

    pub config: DashboardConfig,
    settings: SeriesSettings,

    /// Files found in `data_dir` (empty if the build failed).
    pub catalog: Catalog,

    /// Selected file ids in the order they were selected.
    pub selection: Vec<FileId>,

    pub raw_channel: RawChannel,
    pub cumulative_channel: CumulativeChannel,

    /// Traces for the current selection, recomputed on every change.
    pub extraction: Extraction,

    pub sort_key: SortKey,
    pub sort_direction: SortDirection,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// State for `dir` with its catalog already built.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let config = DashboardConfig::default();
        let settings = series_settings(&config);
        let raw_channel = RawChannel::default();
        let cumulative_channel = CumulativeChannel::default();
        let catalog = Catalog::default();
        let extraction = extract_series(&catalog, &[], raw_channel, cumulative_channel, &settings);

        let mut state = Self {
            data_dir: PathBuf::new(),
            config,
            settings,
            catalog,
            selection: Vec::new(),
            raw_channel,
            cumulative_channel,
            extraction,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            status_message: None,
        };
        state.open_directory(dir.into());
        state
    }

    /// Switch to another data directory: reload settings, rebuild the catalog
    /// and clear the selection.
    pub fn open_directory(&mut self, dir: PathBuf) {
        log::info!("Opening data directory {}", dir.display());
        self.config = DashboardConfig::load_or_default(&dir);
        self.settings = series_settings(&self.config);
        self.selection.clear();
        self.status_message = None;

        match scan(&dir, &self.config.extensions) {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => {
                log::error!("Failed to build catalog: {e}");
                self.catalog = Catalog::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.data_dir = dir;
        self.refresh_charts();
    }

    pub fn is_selected(&self, id: FileId) -> bool {
        self.selection.contains(&id)
    }

    /// Select or deselect one file. Newly selected files go to the end.
    pub fn toggle_selection(&mut self, id: FileId) {
        match self.selection.iter().position(|&s| s == id) {
            Some(pos) => {
                self.selection.remove(pos);
            }
            None => self.selection.push(id),
        }
        self.refresh_charts();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh_charts();
    }

    pub fn set_raw_channel(&mut self, channel: RawChannel) {
        if self.raw_channel != channel {
            self.raw_channel = channel;
            self.refresh_charts();
        }
    }

    pub fn set_cumulative_channel(&mut self, channel: CumulativeChannel) {
        if self.cumulative_channel != channel {
            self.cumulative_channel = channel;
            self.refresh_charts();
        }
    }

    /// Sort the catalog table by `key`; picking the active key again flips
    /// the direction.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Catalog ids in current table order.
    pub fn table_order(&self) -> Vec<FileId> {
        self.catalog.sorted_ids(self.sort_key, self.sort_direction)
    }

    /// Text shown on a chart that has no traces.
    pub fn chart_placeholder(&self) -> &'static str {
        if self.selection.is_empty() {
            "Select files in the table below to compare them."
        } else {
            "No traces could be read from the selected files (see the warning above)."
        }
    }

    /// Re-read the selected files and rebuild both charts.
    pub fn refresh_charts(&mut self) {
        self.extraction = extract_series(
            &self.catalog,
            &self.selection,
            self.raw_channel,
            self.cumulative_channel,
            &self.settings,
        );
    }
}

fn series_settings(config: &DashboardConfig) -> SeriesSettings {
    SeriesSettings {
        time_cutoff_s: config.time_cutoff_s,
        palette: config.trace_palette(),
    }
}

fn scan(dir: &Path, extensions: &[String]) -> Result<Catalog, crate::data::error::DataError> {
    let files = discover_files(dir, extensions)?;
    build_catalog(&files)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::data::error::DataError;

    const ROWS: &str = "Test_Time,Cycle_Index,Current,Voltage,Charge_Capacity,Discharge_Capacity\n\
                        0,1,0.5,3.0,0.1,0.0\n\
                        10,1,0.5,3.1,0.2,0.0\n\
                        20,2,-0.5,3.9,0.2,0.1\n\
                        30,3,0.5,3.2,0.3,0.1\n";

    fn data_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), ROWS).unwrap();
        }
        dir
    }

    #[test]
    fn opening_a_directory_builds_the_catalog() {
        let dir = data_dir(&["b.csv", "a.csv"]);
        std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

        let state = AppState::open(dir.path());
        let names: Vec<&str> = state
            .catalog
            .files()
            .iter()
            .map(|f| f.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert!(state.status_message.is_none());
        assert!(state.extraction.raw.is_empty());
    }

    #[test]
    fn selection_order_drives_chart_order() {
        let dir = data_dir(&["a.csv", "b.csv", "c.csv"]);
        let mut state = AppState::open(dir.path());

        state.toggle_selection(3);
        state.toggle_selection(1);
        assert_eq!(state.selection, vec![3, 1]);
        let names: Vec<&str> = state
            .extraction
            .raw
            .series
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["c.csv", "a.csv"]);
        assert_eq!(state.extraction.cycle.series[0].x, vec![1.0, 2.0]);

        state.toggle_selection(3);
        assert_eq!(state.selection, vec![1]);
        assert!(!state.is_selected(3));
        assert_eq!(state.extraction.raw.series.len(), 1);

        state.clear_selection();
        assert!(state.extraction.raw.is_empty());
        assert!(state.extraction.cycle.is_empty());
    }

    #[test]
    fn changing_channels_recomputes_traces() {
        let dir = data_dir(&["a.csv"]);
        let mut state = AppState::open(dir.path());
        state.toggle_selection(1);

        state.set_raw_channel(RawChannel::Voltage);
        assert_eq!(state.extraction.raw.y_label, "Voltage (V)");
        assert_eq!(state.extraction.raw.series[0].y, vec![3.0, 3.1, 3.9, 3.2]);

        state.set_cumulative_channel(CumulativeChannel::DischargeCapacity);
        assert_eq!(state.extraction.cycle.series[0].y, vec![0.0, 0.1]);

        state.set_raw_channel(RawChannel::Temperature);
        assert!(state.extraction.raw.is_empty());
        assert!(matches!(
            state.extraction.failures[0].error,
            DataError::MissingColumn { .. }
        ));
    }

    #[test]
    fn placeholder_reports_failures_once_files_are_selected() {
        let dir = data_dir(&["a.csv"]);
        let mut state = AppState::open(dir.path());
        assert!(state.chart_placeholder().starts_with("Select files"));

        std::fs::remove_file(dir.path().join("a.csv")).unwrap();
        state.toggle_selection(1);
        assert!(state.extraction.raw.is_empty());
        assert!(state.chart_placeholder().starts_with("No traces"));
    }

    #[test]
    fn broken_file_leaves_an_empty_catalog_and_an_error() {
        let dir = data_dir(&["a.csv"]);
        std::fs::write(dir.path().join("b.csv"), "Test_Time\n0\n").unwrap();

        let state = AppState::open(dir.path());
        assert!(state.catalog.is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("Cycle_Index"));
    }

    #[test]
    fn settings_file_is_applied() {
        let dir = data_dir(&["a.csv"]);
        std::fs::write(dir.path().join("dashboard.json"), r#"{ "time_cutoff_s": 15 }"#).unwrap();

        let mut state = AppState::open(dir.path());
        state.toggle_selection(1);
        assert_eq!(state.extraction.raw.series[0].y.len(), 2);
    }

    #[test]
    fn sorting_toggles_direction_on_same_key() {
        let dir = data_dir(&["a.csv", "b.csv"]);
        let mut state = AppState::open(dir.path());

        state.sort_by(SortKey::Filename);
        assert_eq!(state.table_order(), vec![1, 2]);
        state.sort_by(SortKey::Filename);
        assert_eq!(state.sort_direction, SortDirection::Descending);
        assert_eq!(state.table_order(), vec![2, 1]);
        state.sort_by(SortKey::RowCount);
        assert_eq!(state.sort_direction, SortDirection::Ascending);
    }
}
