//! Grid persisted as a local CBOR snapshot.
//!
//! Every batch rewrites the snapshot through a temp file, so a batch is
//! all-or-nothing on disk as well as in memory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::CellWrite;
use crate::error::{Result, SheetError};
use crate::policy::DEFAULT_CELL_LIMIT;
use crate::region::{Coord, GridRegion};
use crate::store::{GridStore, OpenParams, apply_write, check_write, dump_range};
use crate::util::atomic::write_atomic;

pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Deserialize)]
struct Snapshot {
    version: u16,
    cell_limit: usize,
    cells: Vec<StoredCell>,
}

#[derive(Deserialize)]
struct StoredCell {
    row: u32,
    col: u32,
    value: String,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u16,
    cell_limit: usize,
    cells: Vec<StoredCellRef<'a>>,
}

#[derive(Serialize)]
struct StoredCellRef<'a> {
    row: u32,
    col: u32,
    value: &'a str,
}

pub struct FileGridStore {
    path: PathBuf,
    cell_limit: usize,
    cells: BTreeMap<Coord, String>,
}

impl FileGridStore {
    pub fn open(params: &OpenParams) -> Result<Self> {
        let path = params.grid_path.clone();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound && params.create => {
                let cell_limit = params.cell_limit.unwrap_or(DEFAULT_CELL_LIMIT);
                info!(grid = %path.display(), cell_limit, "creating new grid");
                let store = Self {
                    path,
                    cell_limit,
                    cells: BTreeMap::new(),
                };
                store.persist()?;
                return Ok(store);
            }
            Err(e) => return Err(unavailable(&path, e)),
        };

        let snap: Snapshot = ciborium::de::from_reader(&bytes[..])
            .map_err(|e| SheetError::Format(format!("grid {} decode: {e}", path.display())))?;
        if snap.version != SNAPSHOT_VERSION {
            return Err(SheetError::Format(format!(
                "grid {} has snapshot version {}, expected {SNAPSHOT_VERSION}",
                path.display(),
                snap.version
            )));
        }
        if let Some(requested) = params.cell_limit {
            if requested != snap.cell_limit {
                warn!(
                    grid = %path.display(),
                    requested,
                    stored = snap.cell_limit,
                    "grid keeps the cell limit it was created with"
                );
            }
        }

        let cells: BTreeMap<Coord, String> = snap
            .cells
            .into_iter()
            .filter(|c| !c.value.is_empty())
            .map(|c| (Coord::new(c.row, c.col), c.value))
            .collect();
        debug!(grid = %path.display(), occupied = cells.len(), "opened grid");
        Ok(Self {
            path,
            cell_limit: snap.cell_limit,
            cells,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    fn persist(&self) -> Result<()> {
        let snap = SnapshotRef {
            version: SNAPSHOT_VERSION,
            cell_limit: self.cell_limit,
            cells: self
                .cells
                .iter()
                .map(|(c, v)| StoredCellRef {
                    row: c.row,
                    col: c.col,
                    value: v,
                })
                .collect(),
        };
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&snap, &mut buf)
            .map_err(|e| SheetError::Format(format!("grid encode: {e}")))?;
        write_atomic(&self.path, &buf).map_err(|e| unavailable(&self.path, e))
    }
}

impl GridStore for FileGridStore {
    fn cell_limit(&self) -> usize {
        self.cell_limit
    }

    fn read_range(&self, region: &GridRegion) -> Result<Vec<(Coord, Option<String>)>> {
        Ok(dump_range(&self.cells, region))
    }

    fn write_batch(&mut self, writes: &[CellWrite]) -> Result<()> {
        for w in writes {
            check_write(w, self.cell_limit)?;
        }
        let previous: Vec<(Coord, Option<String>)> = writes
            .iter()
            .map(|w| (w.coord, apply_write(&mut self.cells, w)))
            .collect();

        if let Err(e) = self.persist() {
            // roll back in reverse so repeated coords end at their oldest value
            for (coord, old) in previous.into_iter().rev() {
                apply_write(&mut self.cells, &CellWrite { coord, value: old });
            }
            return Err(e);
        }
        Ok(())
    }
}

fn unavailable(path: &Path, e: io::Error) -> SheetError {
    SheetError::StoreUnavailable(format!("{}: {e}", path.display()))
}
