use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Trace colours used when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#8ECFC9", "#FFBE7A", "#FA7F6F", "#82B0D2", "#BEB8DC",
    "#2878b5", "#9ac9db", "#f8ac8c", "#c82423", "#ff8884",
];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TracePalette: selection position → Color32
// ---------------------------------------------------------------------------

/// Fixed list of trace colours, cycled by selection position.
#[derive(Debug, Clone, PartialEq)]
pub struct TracePalette {
    colors: Vec<Color32>,
}

impl Default for TracePalette {
    fn default() -> Self {
        Self::from_hex(&DEFAULT_PALETTE)
    }
}

impl TracePalette {
    /// Parse `#RRGGBB` / `#RGB` codes. Invalid entries are skipped; if none
    /// are usable, ten generated hues are used instead.
    pub fn from_hex<S: AsRef<str>>(codes: &[S]) -> Self {
        let colors: Vec<Color32> = codes
            .iter()
            .filter_map(|code| {
                let code = code.as_ref();
                match Srgb::<u8>::from_str(code) {
                    Ok(rgb) => Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue)),
                    Err(e) => {
                        log::warn!("Ignoring palette entry '{code}': {e}");
                        None
                    }
                }
            })
            .collect();

        if colors.is_empty() {
            return Self {
                colors: generate_palette(DEFAULT_PALETTE.len()),
            };
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Colour for the trace at `position` in the selection, wrapping around.
    pub fn color_for(&self, position: usize) -> Color32 {
        self.colors[position % self.colors.len()]
    }
}
