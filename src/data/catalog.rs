use std::path::{Path, PathBuf};

use super::error::DataError;
use super::loader::{file_name, load_table};

/// 1-based identifier of a file in the [`Catalog`].
pub type FileId = usize;

// ---------------------------------------------------------------------------
// DataFile – one row of the catalog table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DataFile {
    pub id: FileId,
    pub filename: String,
    pub path: PathBuf,
    pub row_count: usize,
    /// `None` when the cycle column holds no values.
    pub max_cycle: Option<i64>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Files in scan order. `files[i].id == i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    files: Vec<DataFile>,
}

/// Catalog table column used for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Filename,
    RowCount,
    MaxCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Read every file and build the catalog. Any unreadable file, or one
/// without a cycle column, aborts the whole build.
pub fn build_catalog<P: AsRef<Path>>(file_list: &[P]) -> Result<Catalog, DataError> {
    let mut files = Vec::with_capacity(file_list.len());

    for (i, path) in file_list.iter().enumerate() {
        let path = path.as_ref();
        let table = load_table(path)?;
        let max_cycle = table.max_cycle()?;

        files.push(DataFile {
            id: i + 1,
            filename: file_name(path),
            path: path.to_path_buf(),
            row_count: table.len(),
            max_cycle,
        });
    }

    log::info!("Catalog built with {} files", files.len());
    Ok(Catalog { files })
}

impl Catalog {
    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a file by its identifier.
    pub fn get(&self, id: FileId) -> Result<&DataFile, DataError> {
        id.checked_sub(1)
            .and_then(|i| self.files.get(i))
            .ok_or(DataError::InvalidSelection(id))
    }

    /// Identifiers ordered by one table column. Ties keep catalog order.
    pub fn sorted_ids(&self, key: SortKey, direction: SortDirection) -> Vec<FileId> {
        let mut files: Vec<&DataFile> = self.files.iter().collect();
        files.sort_by(|a, b| {
            let ord = match key {
                SortKey::Id => a.id.cmp(&b.id),
                SortKey::Filename => a.filename.cmp(&b.filename),
                SortKey::RowCount => a.row_count.cmp(&b.row_count),
                // None < Some(_), so files without cycles come first ascending.
                SortKey::MaxCycle => a.max_cycle.cmp(&b.max_cycle),
            };
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        files.into_iter().map(|f| f.id).collect()
    }
}
