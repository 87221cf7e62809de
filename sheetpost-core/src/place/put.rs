use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::batch::write_batched;
use super::wipe::stale_prefix_clears;
use super::{load_ordered, occupied_prefix};
use crate::chunking::fixed::split;
use crate::codec::escape::escape;
use crate::codec::{Frame, uu};
use crate::domain::{CellWrite, preview};
use crate::error::{Result, SheetError};
use crate::policy::PostOptions;
use crate::region::GridRegion;
use crate::stats::{Placement, PutReport};
use crate::store::GridStore;

/// Lay `text` out over `region`: clear the stale prefix, then write one
/// escaped chunk per cell in placement order.
///
/// On success the region holds exactly the new chunks followed by an
/// unused cell (unless the chunks fill the region). Nothing is written
/// when the region is too small.
pub fn place_text(
    store: &mut dyn GridStore,
    region: &GridRegion,
    text: &str,
    opts: &PostOptions,
) -> Result<Placement> {
    opts.check_cell_limit(store.cell_limit())?;
    let chunks = split(text, opts.chunk_capacity);
    let available = region.len();
    if chunks.len() > available {
        return Err(SheetError::RegionExhausted {
            needed: chunks.len(),
            available,
        });
    }

    let slots = load_ordered(store, region)?;
    let stale = occupied_prefix(&slots);
    let mut clears = stale_prefix_clears(region, &slots);
    // A cell past an old gap would otherwise read as a continuation.
    if chunks.len() > stale {
        if let (Some(Some(_)), Some(coord)) =
            (slots.get(chunks.len()), region.coord_at(chunks.len()))
        {
            debug!(cell = %coord, "clearing stray cell after the new data");
            clears.push(CellWrite::clear(coord));
        }
    }

    info!(%region, cells = clears.len(), "wiping the existing data");
    let mut batches = write_batched(store, &clears, opts.batch_size, "clear")?;

    let writes: Vec<CellWrite> = chunks
        .iter()
        .zip(region.coords())
        .map(|(chunk, coord)| {
            debug!(cell = %coord, part = ?preview(chunk), "write");
            CellWrite::set(coord, escape(chunk))
        })
        .collect();
    info!(chunks = writes.len(), "writing chunks");
    batches += write_batched(store, &writes, opts.batch_size, "write")?;

    Ok(Placement {
        chunks: writes.len(),
        cells_cleared: clears.len(),
        batches,
        last: writes.last().map(|w| w.coord),
    })
}

pub fn put_blob(
    store: &mut dyn GridStore,
    region: &GridRegion,
    frame: &Frame,
    opts: &PostOptions,
) -> Result<PutReport> {
    let framed = uu::encode(frame);
    info!(
        name = frame.name(),
        bytes = frame.data().len(),
        framed = framed.len(),
        "encoded blob"
    );
    let placement = place_text(store, region, &framed, opts)?;
    let report = PutReport {
        name: frame.name().to_string(),
        blob_len: frame.data().len() as u64,
        framed_len: framed.len(),
        placement,
        digest: *blake3::hash(frame.data()).as_bytes(),
    };
    info!(
        name = %report.name,
        cells = report.placement.chunks,
        last = ?report.placement.last,
        "blob stored"
    );
    Ok(report)
}

/// Frame the file at `src` under its file name and permission bits, then put it.
pub fn put_file(
    store: &mut dyn GridStore,
    region: &GridRegion,
    src: &Path,
    opts: &PostOptions,
) -> Result<PutReport> {
    let meta = fs::metadata(src)?;
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SheetError::InvalidLayout(format!("{} has no file name", src.display())))?;
    let data = fs::read(src)?;
    let frame = Frame::new(name, mode_from(&meta), data)?;
    put_blob(store, region, &frame, opts)
}

fn mode_from(_md: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        _md.permissions().mode()
    }
    #[cfg(not(unix))]
    {
        crate::codec::DEFAULT_MODE
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::region::Coord;
    use crate::store_mem::MemGridStore;

    fn opts(capacity: usize, batch: usize) -> PostOptions {
        PostOptions {
            chunk_capacity: NonZeroUsize::new(capacity).unwrap(),
            batch_size: NonZeroUsize::new(batch).unwrap(),
        }
    }

    #[test]
    fn chunks_go_down_the_first_column() {
        let region = GridRegion::from_a1("A1:B1000").unwrap();
        let mut s = MemGridStore::new(5);
        let p = place_text(&mut s, &region, "ABCDEFGHI", &opts(4, 100)).unwrap();

        assert_eq!(s.get(Coord::new(1, 1)), Some("'ABCD"));
        assert_eq!(s.get(Coord::new(2, 1)), Some("'EFGH"));
        assert_eq!(s.get(Coord::new(3, 1)), Some("'I"));
        assert_eq!(s.get(Coord::new(4, 1)), None);
        assert_eq!(p.chunks, 3);
        assert_eq!(p.last, Some(Coord::new(3, 1)));
    }

    #[test]
    fn overflow_rolls_into_the_next_column() {
        let region = GridRegion::from_a1("A1:B2").unwrap();
        let mut s = MemGridStore::new(5);
        place_text(&mut s, &region, "ABCDEFGHI", &opts(4, 100)).unwrap();

        assert_eq!(s.get(Coord::new(1, 1)), Some("'ABCD"));
        assert_eq!(s.get(Coord::new(2, 1)), Some("'EFGH"));
        assert_eq!(s.get(Coord::new(1, 2)), Some("'I"));
        assert_eq!(s.get(Coord::new(2, 2)), None);
    }

    #[test]
    fn exhausted_region_writes_nothing() {
        let region = GridRegion::from_a1("A1:A2").unwrap();
        let mut s = MemGridStore::new(5);
        s.seed(Coord::new(1, 1), "'old");
        let err = place_text(&mut s, &region, "ABCDEFGHI", &opts(4, 100)).unwrap_err();
        assert!(matches!(
            err,
            SheetError::RegionExhausted {
                needed: 3,
                available: 2
            }
        ));
        assert_eq!(s.get(Coord::new(1, 1)), Some("'old"));
    }

    #[test]
    fn saturated_region_has_no_sentinel() {
        let region = GridRegion::from_a1("A1:A3").unwrap();
        let mut s = MemGridStore::new(5);
        let p = place_text(&mut s, &region, "ABCDEFGHI", &opts(4, 1)).unwrap();
        assert_eq!(p.last, Some(Coord::new(3, 1)));
        assert_eq!(p.batches, 3);
        assert_eq!(s.occupied(), 3);
    }

    #[test]
    fn capacity_must_fit_marker() {
        let region = GridRegion::default();
        let mut s = MemGridStore::new(4);
        assert!(matches!(
            place_text(&mut s, &region, "ABCD", &opts(4, 10)),
            Err(SheetError::InvalidLayout(_))
        ));
    }

    #[test]
    fn stale_prefix_is_cleared_before_writing() {
        let region = GridRegion::from_a1("A1:A10").unwrap();
        let mut s = MemGridStore::new(5);
        for row in 1..=6 {
            s.seed(Coord::new(row, 1), "'old");
        }
        let p = place_text(&mut s, &region, "ABCDE", &opts(4, 100)).unwrap();
        assert_eq!(p.cells_cleared, 6);
        assert_eq!(s.get(Coord::new(2, 1)), Some("'E"));
        assert_eq!(s.occupied(), 2);
    }

    #[test]
    fn stray_cell_after_a_gap_becomes_the_sentinel() {
        let region = GridRegion::from_a1("A1:A10").unwrap();
        let mut s = MemGridStore::new(5);
        s.seed(Coord::new(3, 1), "'stray");
        let p = place_text(&mut s, &region, "ABCDEFGHI", &opts(4, 100)).unwrap();
        assert_eq!(p.cells_cleared, 0);
        s.seed(Coord::new(5, 1), "'later");

        // row 5 sits right after the new data, so it must read as empty
        let p = place_text(&mut s, &region, "ABCDEFGHIJKLM", &opts(4, 100)).unwrap();
        assert_eq!(p.chunks, 4);
        assert_eq!(s.get(Coord::new(4, 1)), Some("'M"));
        assert_eq!(s.get(Coord::new(5, 1)), None);
    }

    #[test]
    fn put_blob_reports_digest_and_sizes() {
        let region = GridRegion::default();
        let mut s = MemGridStore::default();
        let frame = Frame::new("a.bin", 0o600, vec![1, 2, 3]).unwrap();
        let r = put_blob(&mut s, &region, &frame, &PostOptions::default()).unwrap();
        assert_eq!(r.blob_len, 3);
        assert_eq!(r.placement.chunks, 1);
        assert_eq!(r.digest, *blake3::hash(&[1, 2, 3]).as_bytes());
        assert_eq!(r.digest_hex().len(), 64);
        assert!(s.get(Coord::new(1, 1)).unwrap().starts_with("'begin 600 a.bin\n"));
    }
}
