use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Hosted spreadsheet services cap a cell at 50 000 characters.
pub const DEFAULT_CELL_LIMIT: usize = 50_000;
pub const DEFAULT_CHUNK_CAPACITY: NonZeroUsize = NonZeroUsize::new(49_500).unwrap();
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOptions {
    /// Max chars of framed text per cell, escape marker not included.
    pub chunk_capacity: NonZeroUsize,
    /// Cells per store call.
    pub batch_size: NonZeroUsize,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PostOptions {
    /// Every escaped chunk (capacity + 1 marker char) must fit in one cell.
    pub fn check_cell_limit(&self, cell_limit: usize) -> Result<()> {
        if self.chunk_capacity.get() >= cell_limit {
            return Err(SheetError::InvalidLayout(format!(
                "chunk capacity {} leaves no room for the escape marker in {cell_limit}-char cells",
                self.chunk_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fit_default_cells() {
        PostOptions::default()
            .check_cell_limit(DEFAULT_CELL_LIMIT)
            .unwrap();
    }

    #[test]
    fn capacity_must_leave_room_for_marker() {
        let opts = PostOptions {
            chunk_capacity: NonZeroUsize::new(10).unwrap(),
            ..Default::default()
        };
        assert!(opts.check_cell_limit(11).is_ok());
        assert!(matches!(
            opts.check_cell_limit(10),
            Err(SheetError::InvalidLayout(_))
        ));
    }
}
