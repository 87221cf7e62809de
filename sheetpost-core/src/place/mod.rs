//! Grid placement engine.
//!
//! Chunks of framed text are laid out over a [`GridRegion`] in placement
//! order, one escaped chunk per cell, terminated by the first unused
//! cell. The write path ([`put`]), the clear path ([`wipe`]) and the read
//! path ([`get`]) all walk the region through [`GridRegion::coord_at`],
//! so a layout written by one is read back identically by the other.

use crate::error::{Result, SheetError};
use crate::region::GridRegion;
use crate::store::GridStore;

mod batch;
pub mod get;
pub mod put;
pub mod wipe;

/// Region contents indexed by placement order.
///
/// The store may return cells in any order; each value is slotted by its
/// coordinate.
pub(crate) fn load_ordered(
    store: &dyn GridStore,
    region: &GridRegion,
) -> Result<Vec<Option<String>>> {
    let mut slots = vec![None; region.len()];
    for (coord, value) in store.read_range(region)? {
        let idx = region
            .index_of(coord)
            .ok_or(SheetError::OutOfRegion { coord })?;
        slots[idx] = value.filter(|v| !v.is_empty());
    }
    Ok(slots)
}

/// Number of occupied cells before the first unused one.
pub(crate) fn occupied_prefix(slots: &[Option<String>]) -> usize {
    slots.iter().take_while(|s| s.is_some()).count()
}
