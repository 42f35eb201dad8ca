/// Data layer: file discovery, loading, cataloguing and trace extraction.
///
/// Architecture:
/// ```text
///   data directory (.csv / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  discover files, parse file → CyclerTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  id, filename, row count, max cycle per file
///   └──────────┘
///        │  selected ids + channels
///        ▼
///   ┌──────────┐
///   │  series   │  raw trace (time) + cycle trace (cycle number)
///   └──────────┘
/// ```

pub mod catalog;
pub mod error;
pub mod loader;
pub mod model;
pub mod series;
