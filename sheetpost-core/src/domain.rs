// sheetpost_core/src/domain.rs
use serde::Serialize;

use crate::region::Coord;

/// One cell assignment in a store batch. `None` resets the cell to empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWrite {
    pub coord: Coord,
    pub value: Option<String>,
}

impl CellWrite {
    pub fn set(coord: Coord, value: String) -> Self {
        Self {
            coord,
            value: Some(value),
        }
    }

    pub fn clear(coord: Coord) -> Self {
        Self { coord, value: None }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CellSummary {
    pub coord: Coord,
    /// Stored length in chars, escape marker included.
    pub len: usize,
    /// Leading chars of the payload after the marker, unescaped.
    pub preview: String,
    pub escaped: bool,
}

pub(crate) const PREVIEW_CHARS: usize = 20;

pub(crate) fn preview(s: &str) -> String {
    s.chars().take(PREVIEW_CHARS).collect()
}
