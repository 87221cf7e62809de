use std::num::NonZeroUsize;

use tracing::debug;

use crate::domain::CellWrite;
use crate::error::{Result, SheetError};
use crate::store::GridStore;

/// Send `writes` to the store `batch_size` cells at a time, in order.
/// Returns the number of store calls made.
pub(crate) fn write_batched(
    store: &mut dyn GridStore,
    writes: &[CellWrite],
    batch_size: NonZeroUsize,
    phase: &'static str,
) -> Result<usize> {
    let mut calls = 0usize;
    for batch in writes.chunks(batch_size.get()) {
        let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
            continue;
        };
        let (first, last) = (first.coord, last.coord);
        debug!(phase, %first, %last, cells = batch.len(), "uploading batch");
        store
            .write_batch(batch)
            .map_err(|source| SheetError::BatchFailed {
                first,
                last,
                source: Box::new(source),
            })?;
        calls += 1;
    }
    Ok(calls)
}
