use std::collections::BTreeMap;

use crate::domain::CellWrite;
use crate::error::{Result, SheetError};
use crate::policy::DEFAULT_CELL_LIMIT;
use crate::region::{Coord, GridRegion};
use crate::store::{GridStore, apply_write, check_write, dump_range};

/// Grid kept entirely in memory.
#[derive(Clone, Debug)]
pub struct MemGridStore {
    cell_limit: usize,
    bounds: Option<GridRegion>,
    cells: BTreeMap<Coord, String>,
}

impl MemGridStore {
    pub fn new(cell_limit: usize) -> Self {
        Self {
            cell_limit,
            bounds: None,
            cells: BTreeMap::new(),
        }
    }

    /// Refuse reads and writes outside `bounds`, like a sheet with a fixed size.
    pub fn with_bounds(mut self, bounds: GridRegion) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn get(&self, coord: Coord) -> Option<&str> {
        self.cells.get(&coord).map(String::as_str)
    }

    /// Store a raw value, skipping the cell limit; models edits made by
    /// other tools.
    pub fn seed(&mut self, coord: Coord, value: impl Into<String>) {
        apply_write(&mut self.cells, &CellWrite::set(coord, value.into()));
    }

    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    fn check_bounds(&self, coord: Coord) -> Result<()> {
        match self.bounds {
            Some(b) if !b.contains(coord) => Err(SheetError::OutOfRegion { coord }),
            _ => Ok(()),
        }
    }
}

impl Default for MemGridStore {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_LIMIT)
    }
}

impl GridStore for MemGridStore {
    fn cell_limit(&self) -> usize {
        self.cell_limit
    }

    fn read_range(&self, region: &GridRegion) -> Result<Vec<(Coord, Option<String>)>> {
        self.check_bounds(region.origin())?;
        self.check_bounds(region.end())?;
        Ok(dump_range(&self.cells, region))
    }

    fn write_batch(&mut self, writes: &[CellWrite]) -> Result<()> {
        for w in writes {
            self.check_bounds(w.coord)?;
            check_write(w, self.cell_limit)?;
        }
        for w in writes {
            apply_write(&mut self.cells, w);
        }
        Ok(())
    }
}
