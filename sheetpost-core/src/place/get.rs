use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::load_ordered;
use crate::chunking::fixed::join;
use crate::codec::escape::unescape;
use crate::codec::{Frame, uu};
use crate::domain::preview;
use crate::error::{Result, SheetError};
use crate::region::GridRegion;
use crate::stats::GetReport;
use crate::store::GridStore;
use crate::util::atomic::write_atomic_verified;

/// Framed text recovered from a region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gathered {
    pub text: String,
    pub cells: usize,
}

/// Walk `region` in placement order up to the first unused cell and
/// concatenate the unescaped chunks. Cells past that point are ignored.
pub fn read_text(store: &dyn GridStore, region: &GridRegion) -> Result<Gathered> {
    let slots = load_ordered(store, region)?;
    let mut parts: Vec<&str> = Vec::new();
    for (slot, coord) in slots.iter().zip(region.coords()) {
        let Some(value) = slot else {
            debug!(cell = %coord, "reached unused cell");
            break;
        };
        let part = unescape(coord, value)?;
        debug!(cell = %coord, part = ?preview(part), "trim");
        parts.push(part);
    }
    Ok(Gathered {
        text: join(&parts),
        cells: parts.len(),
    })
}

fn decode_grid(store: &dyn GridStore, region: &GridRegion) -> Result<(Frame, Gathered)> {
    let gathered = read_text(store, region)?;
    info!(%region, cells = gathered.cells, framed = gathered.text.len(), "read grid data");
    let frame = uu::decode(&gathered.text)?;
    info!(name = %frame.name(), bytes = frame.data().len(), "data decoded");
    Ok((frame, gathered))
}

fn build_report(frame: &Frame, gathered: &Gathered, digest: &blake3::Hash) -> GetReport {
    GetReport {
        name: frame.name().to_string(),
        mode: frame.mode(),
        blob_len: frame.data().len() as u64,
        framed_len: gathered.text.len(),
        cells_read: gathered.cells,
        digest: *digest.as_bytes(),
        saved_to: None,
    }
}

pub fn get_blob(store: &dyn GridStore, region: &GridRegion) -> Result<(Frame, GetReport)> {
    let (frame, gathered) = decode_grid(store, region)?;
    let report = build_report(&frame, &gathered, &blake3::hash(frame.data()));
    Ok((frame, report))
}

/// Reconstruct the blob into `dest` with its stored permission bits.
/// When `dest` is a directory the blob keeps the name it was stored
/// under. The digest is taken while the file streams to disk; with
/// `expect` set, a mismatch discards the file before it replaces `dest`.
pub fn get_file(
    store: &dyn GridStore,
    region: &GridRegion,
    dest: &Path,
    expect: Option<&[u8; 32]>,
) -> Result<GetReport> {
    let (frame, gathered) = decode_grid(store, region)?;
    let target = if dest.is_dir() {
        safe_join(dest, frame.name())?
    } else {
        dest.to_path_buf()
    };

    let digest = write_atomic_verified(&target, frame.data(), frame.mode(), |digest| {
        match expect {
            Some(expected) if expected != digest.as_bytes() => Err(SheetError::DigestMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(digest.as_bytes()),
            }),
            _ => Ok(()),
        }
    })?;
    info!(path = %target.display(), "saved blob");

    let mut report = build_report(&frame, &gathered, &digest);
    report.saved_to = Some(target);
    Ok(report)
}

/// Stored names come from the grid, so only a plain file name is accepted.
fn safe_join(root: &Path, name: &str) -> Result<PathBuf> {
    let mut comps = Path::new(name).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(_)), None) => Ok(root.join(name)),
        _ => Err(SheetError::InvalidLayout(format!(
            "unsafe stored name: {name:?}"
        ))),
    }
}
