use eframe::egui::Color32;

use super::catalog::{Catalog, FileId};
use super::error::DataError;
use super::loader::load_table;
use super::model::{CumulativeChannel, CyclerTable, RawChannel, TEST_TIME};
use crate::color::TracePalette;

const SECONDS_PER_HOUR: f64 = 3600.0;

pub const TIME_AXIS_LABEL: &str = "Time (h)";
pub const CYCLE_AXIS_LABEL: &str = "Cycle Number";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One chart trace. `x` and `y` have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color32,
}

/// The traces of one chart plus its axis labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub x_label: &'static str,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl SeriesSet {
    fn new(x_label: &'static str, y_label: impl Into<String>) -> Self {
        Self {
            x_label,
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A selected file (or one of its traces) that could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub id: FileId,
    pub error: DataError,
}

/// Result of one selection event.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub raw: SeriesSet,
    pub cycle: SeriesSet,
    pub failures: Vec<FileFailure>,
}

/// Parameters that stay fixed between selection events.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSettings {
    /// Raw traces keep samples with `Test_Time` strictly below this (seconds).
    pub time_cutoff_s: f64,
    pub palette: TracePalette,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            time_cutoff_s: 200_000.0,
            palette: TracePalette::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Both traces of one file; each can fail on its own (missing channel).
struct FileTraces {
    raw: Result<Series, DataError>,
    cycle: Result<Series, DataError>,
}

/// Load every selected file from disk and derive its raw and cycle traces.
///
/// Output order follows `selected_ids`; the trace colour is picked by the
/// position in `selected_ids`. Failures are collected per file and never
/// prevent the remaining files from producing traces.
pub fn extract_series(
    catalog: &Catalog,
    selected_ids: &[FileId],
    raw_channel: RawChannel,
    cumulative_channel: CumulativeChannel,
    settings: &SeriesSettings,
) -> Extraction {
    let outcomes: Vec<(FileId, Result<FileTraces, DataError>)> = selected_ids
        .iter()
        .enumerate()
        .map(|(position, &id)| {
            let color = settings.palette.color_for(position);
            let traces = file_traces(catalog, id, raw_channel, cumulative_channel, settings, color);
            (id, traces)
        })
        .collect();

    let mut extraction = Extraction {
        raw: SeriesSet::new(TIME_AXIS_LABEL, raw_channel.axis_label()),
        cycle: SeriesSet::new(CYCLE_AXIS_LABEL, cumulative_channel.axis_label()),
        failures: Vec::new(),
    };

    let fail = |id: FileId, error: DataError| {
        log::warn!("File {id}: {error}");
        FileFailure { id, error }
    };

    for (id, outcome) in outcomes {
        match outcome {
            Ok(traces) => {
                match traces.raw {
                    Ok(series) => extraction.raw.series.push(series),
                    Err(e) => extraction.failures.push(fail(id, e)),
                }
                match traces.cycle {
                    Ok(series) => extraction.cycle.series.push(series),
                    Err(e) => extraction.failures.push(fail(id, e)),
                }
            }
            Err(e) => extraction.failures.push(fail(id, e)),
        }
    }

    log::debug!(
        "Extracted {} raw / {} cycle traces for {} selected files ({} failures)",
        extraction.raw.series.len(),
        extraction.cycle.series.len(),
        selected_ids.len(),
        extraction.failures.len()
    );
    extraction
}

fn file_traces(
    catalog: &Catalog,
    id: FileId,
    raw_channel: RawChannel,
    cumulative_channel: CumulativeChannel,
    settings: &SeriesSettings,
    color: Color32,
) -> Result<FileTraces, DataError> {
    let file = catalog.get(id)?;
    let table = load_table(&file.path)?;

    let named = |(x, y): (Vec<f64>, Vec<f64>)| Series {
        name: file.filename.clone(),
        x,
        y,
        color,
    };

    Ok(FileTraces {
        raw: raw_trace(&table, raw_channel, settings.time_cutoff_s).map(named),
        cycle: cycle_trace(&table, cumulative_channel).map(named),
    })
}

/// Samples with `Test_Time < cutoff_s`, x in hours, y = `channel`.
pub fn raw_trace(
    table: &CyclerTable,
    channel: RawChannel,
    cutoff_s: f64,
) -> Result<(Vec<f64>, Vec<f64>), DataError> {
    let time = table.column(TEST_TIME)?;
    let values = table.column(channel.column())?;

    Ok(time
        .iter()
        .zip(values)
        .filter(|&(&t, _)| t < cutoff_s)
        .map(|(&t, &v)| (t / SECONDS_PER_HOUR, v))
        .unzip())
}

/// Last recorded value of `channel` in every cycle except the final one,
/// x = cycle index. The final cycle is always treated as still in progress.
pub fn cycle_trace(
    table: &CyclerTable,
    channel: CumulativeChannel,
) -> Result<(Vec<f64>, Vec<f64>), DataError> {
    let mut records = table.cycle_records(channel.column())?;
    records.pop();

    Ok(records
        .into_iter()
        .map(|r| (r.cycle_index as f64, r.value))
        .unzip())
}
