use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::region::Coord;

/// Outcome of laying framed text out over a region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub chunks: usize,
    pub cells_cleared: usize,
    pub batches: usize,
    /// Last cell written; `None` when the text was empty.
    pub last: Option<Coord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PutReport {
    pub name: String,
    pub blob_len: u64,
    pub framed_len: usize,
    pub placement: Placement,
    #[serde(serialize_with = "serialize_digest")]
    pub digest: [u8; 32],
}

impl PutReport {
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GetReport {
    pub name: String,
    pub mode: u32,
    pub blob_len: u64,
    pub framed_len: usize,
    pub cells_read: usize,
    #[serde(serialize_with = "serialize_digest")]
    pub digest: [u8; 32],
    /// Set by file-level retrieval once the blob is on disk.
    pub saved_to: Option<PathBuf>,
}

impl GetReport {
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

fn serialize_digest<S: Serializer>(digest: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(digest))
}
