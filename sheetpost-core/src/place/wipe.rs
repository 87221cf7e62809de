use tracing::{debug, info};

use super::batch::write_batched;
use super::{load_ordered, occupied_prefix};
use crate::domain::CellWrite;
use crate::error::Result;
use crate::policy::PostOptions;
use crate::region::GridRegion;
use crate::store::GridStore;

/// Clears for the occupied prefix of `slots`: everything before the
/// first unused cell is left over from an earlier occupant.
pub(crate) fn stale_prefix_clears(region: &GridRegion, slots: &[Option<String>]) -> Vec<CellWrite> {
    let stale = occupied_prefix(slots);
    region
        .coords()
        .take(stale)
        .inspect(|c| debug!(cell = %c, "wiping"))
        .map(CellWrite::clear)
        .collect()
}

/// Reset the occupied prefix of `region` to unused cells. Cells after the
/// first gap are not touched. Returns the number of cells cleared.
pub fn wipe(store: &mut dyn GridStore, region: &GridRegion, opts: &PostOptions) -> Result<usize> {
    let slots = load_ordered(store, region)?;
    let clears = stale_prefix_clears(region, &slots);
    if clears.is_empty() {
        info!(%region, "region already empty");
        return Ok(0);
    }
    let batches = write_batched(store, &clears, opts.batch_size, "wipe")?;
    info!(%region, cells = clears.len(), batches, "wiped stale cells");
    Ok(clears.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Coord;
    use crate::store_mem::MemGridStore;

    #[test]
    fn clears_only_up_to_the_first_gap() {
        let region = GridRegion::from_a1("A1:A5").unwrap();
        let mut s = MemGridStore::default();
        s.seed(Coord::new(1, 1), "'a");
        s.seed(Coord::new(2, 1), "'b");
        s.seed(Coord::new(4, 1), "'beyond the gap");

        let cleared = wipe(&mut s, &region, &PostOptions::default()).unwrap();
        assert_eq!(cleared, 2);
        assert_eq!(s.get(Coord::new(1, 1)), None);
        assert_eq!(s.get(Coord::new(2, 1)), None);
        assert_eq!(s.get(Coord::new(4, 1)), Some("'beyond the gap"));
    }

    #[test]
    fn empty_region_is_a_no_op() {
        let region = GridRegion::from_a1("A1:B2").unwrap();
        let mut s = MemGridStore::default();
        assert_eq!(wipe(&mut s, &region, &PostOptions::default()).unwrap(), 0);
    }

    #[test]
    fn wipe_follows_column_rollover() {
        let region = GridRegion::from_a1("A1:B2").unwrap();
        let mut s = MemGridStore::default();
        for c in region.coords().take(3) {
            s.seed(c, "'x");
        }
        assert_eq!(wipe(&mut s, &region, &PostOptions::default()).unwrap(), 3);
        assert_eq!(s.occupied(), 0);
    }
}
