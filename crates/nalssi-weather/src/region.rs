//! Static table mapping forecast grid cells to administrative names.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::district::parse_district;
use crate::types::GridCell;

const UNKNOWN_REGION: &str = "알 수 없는 지역";

/// One row of the region table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRow {
    pub city: String,
    #[serde(default)]
    pub gu: String,
    #[serde(default)]
    pub dong: String,
    pub nx: i32,
    pub ny: i32,
}

impl RegionRow {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.nx, self.ny)
    }

    pub fn name(&self) -> RegionName {
        RegionName {
            city: self.city.clone(),
            gu: self.gu.clone(),
            dong: self.dong.clone(),
        }
    }
}

/// City / district / neighborhood triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionName {
    pub city: String,
    pub gu: String,
    pub dong: String,
}

impl RegionName {
    pub fn new(city: impl Into<String>, gu: impl Into<String>, dong: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            gu: gu.into(),
            dong: dong.into(),
        }
    }

    /// Placeholder for a cell with no table entry
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_REGION, "", "")
    }

    pub fn is_unknown(&self) -> bool {
        self.city == UNKNOWN_REGION && self.gu.is_empty() && self.dong.is_empty()
    }

    /// Non-empty parts joined with spaces
    pub fn full(&self) -> String {
        [&self.city, &self.gu, &self.dong]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only region lookup, indexed by grid cell.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    rows: Vec<RegionRow>,
    by_cell: HashMap<GridCell, Vec<usize>>,
}

impl RegionTable {
    pub fn from_rows(rows: Vec<RegionRow>) -> Self {
        let mut by_cell: HashMap<GridCell, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_cell.entry(row.cell()).or_default().push(i);
        }
        Self { rows, by_cell }
    }

    /// Load a JSON array of `{city, gu, dong, nx, ny}` objects.
    pub fn load(path: &Path) -> Result<Self, RegionError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rows: Vec<RegionRow> =
            serde_json::from_str(&contents).map_err(|source| RegionError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        tracing::debug!("Loaded {} region rows from {}", rows.len(), path.display());
        Ok(Self::from_rows(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `cell`, preferring one with a neighborhood name.
    pub fn lookup(&self, cell: GridCell) -> Option<&RegionRow> {
        let indices = self.by_cell.get(&cell)?;
        indices
            .iter()
            .map(|&i| &self.rows[i])
            .find(|row| !row.dong.is_empty())
            .or_else(|| indices.first().map(|&i| &self.rows[i]))
    }

    /// Name for `cell`, or [`RegionName::unknown`].
    pub fn describe(&self, cell: GridCell) -> RegionName {
        self.lookup(cell)
            .map(RegionRow::name)
            .unwrap_or_else(RegionName::unknown)
    }

    /// Row for a (city, gu, dong) selection.
    ///
    /// Falls back to the first row matching city and gu, then city alone,
    /// when the exact triple is not in the table.
    pub fn find_by_names(&self, city: &str, gu: &str, dong: &str) -> Option<&RegionRow> {
        let exact = self
            .rows
            .iter()
            .find(|r| r.city == city && r.gu == gu && r.dong == dong);
        if exact.is_some() {
            return exact;
        }

        if !gu.is_empty() {
            if let Some(row) = self.rows.iter().find(|r| r.city == city && r.gu == gu) {
                return Some(row);
            }
        }

        self.rows.iter().find(|r| r.city == city)
    }

    /// Grid cell and name for a `시-구-동` district entry.
    ///
    /// The name is the entry's own; the cell may come from a coarser row.
    pub fn resolve_district(&self, entry: &str) -> Option<(GridCell, RegionName)> {
        let name = parse_district(entry);
        let row = self.find_by_names(&name.city, &name.gu, &name.dong)?;
        Some((row.cell(), name))
    }
}
