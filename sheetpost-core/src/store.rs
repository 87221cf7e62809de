// sheetpost_core/src/store.rs
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::CellWrite;
use crate::error::{Result, SheetError};
use crate::region::{Coord, GridRegion};

#[derive(Clone, Debug)]
pub struct OpenParams {
    pub grid_path: PathBuf,
    /// Applied when a grid is created; an existing grid keeps its own limit.
    pub cell_limit: Option<usize>,
    /// Create an empty grid when `grid_path` does not exist.
    pub create: bool,
}

/// An addressed container of string cells.
///
/// `None` is an unused cell. Implementations treat an empty string the
/// same way, so callers never see `Some("")`.
pub trait GridStore: Send {
    /// Maximum chars a single cell value may hold.
    fn cell_limit(&self) -> usize;

    /// Every cell of `region`, in whatever order the backend yields them.
    fn read_range(&self, region: &GridRegion) -> Result<Vec<(Coord, Option<String>)>>;

    /// Apply one batch. Either every write lands or none does.
    fn write_batch(&mut self, writes: &[CellWrite]) -> Result<()>;
}

pub(crate) fn check_write(w: &CellWrite, limit: usize) -> Result<()> {
    if let Some(v) = &w.value {
        let len = v.chars().count();
        if len > limit {
            return Err(SheetError::CellOverflow {
                coord: w.coord,
                len,
                limit,
            });
        }
    }
    Ok(())
}

/// Returns the value the cell held before.
pub(crate) fn apply_write(cells: &mut BTreeMap<Coord, String>, w: &CellWrite) -> Option<String> {
    match &w.value {
        Some(v) if !v.is_empty() => cells.insert(w.coord, v.clone()),
        _ => cells.remove(&w.coord),
    }
}

/// Row-major dump of `region`, the order hosted sheets return ranges in.
pub(crate) fn dump_range(
    cells: &BTreeMap<Coord, String>,
    region: &GridRegion,
) -> Vec<(Coord, Option<String>)> {
    let (origin, end) = (region.origin(), region.end());
    let mut out = Vec::with_capacity(region.len());
    for row in origin.row..=end.row {
        for col in origin.col..=end.col {
            let c = Coord::new(row, col);
            out.push((c, cells.get(&c).cloned()));
        }
    }
    out
}
