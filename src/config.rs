use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_PALETTE, TracePalette};

/// Settings file looked up in the data directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Dashboard settings. Every field is optional in `dashboard.json`:
///
/// ```json
/// { "palette": ["#8ECFC9", "#FFBE7A"], "time_cutoff_s": 100000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Trace colours as `#RRGGBB`, cycled by selection position.
    pub palette: Vec<String>,
    /// Raw chart keeps samples with `Test_Time` strictly below this (seconds).
    pub time_cutoff_s: f64,
    /// File extensions listed in the catalog.
    pub extensions: Vec<String>,
    pub raw_line_width: f32,
    pub cycle_line_width: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            time_cutoff_s: 200_000.0,
            extensions: vec!["csv".to_string(), "parquet".to_string()],
            raw_line_width: 1.0,
            cycle_line_width: 2.0,
        }
    }
}

impl DashboardConfig {
    /// Read `dashboard.json` from `dir`, or defaults when there is none.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Like [`DashboardConfig::load`], but a broken file only logs and falls
    /// back to defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        Self::load(dir).unwrap_or_else(|e| {
            log::warn!("Using default settings: {e:#}");
            Self::default()
        })
    }

    pub fn trace_palette(&self) -> TracePalette {
        TracePalette::from_hex(&self.palette)
    }
}
