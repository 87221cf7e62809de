use crate::region::Coord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    /// Text handed to the framer was not produced by a matching encoder.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("region exhausted: {needed} cells needed, {available} available")]
    RegionExhausted { needed: usize, available: usize },

    /// An occupied cell lacks the escape marker every chunk is written with.
    #[error("corrupt cell {coord}: missing escape marker")]
    CorruptCell { coord: Coord },

    #[error("grid store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("batch {first}..{last} failed: {source}")]
    BatchFailed {
        first: Coord,
        last: Coord,
        #[source]
        source: Box<SheetError>,
    },

    #[error("cell {coord}: value of {len} chars exceeds the {limit}-char cell limit")]
    CellOverflow {
        coord: Coord,
        len: usize,
        limit: usize,
    },

    #[error("cell {coord} is outside the addressable grid")]
    OutOfRegion { coord: Coord },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SheetError>;
