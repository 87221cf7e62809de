use crate::codec::escape::ESCAPE_MARKER;
use crate::domain::{CellSummary, preview};
use crate::error::Result;
use crate::place::load_ordered;
use crate::region::GridRegion;
use crate::store::GridStore;

/// Summaries of the occupied prefix of `region`, without decoding.
/// Cells missing the escape marker are reported rather than rejected.
pub fn inspect(store: &dyn GridStore, region: &GridRegion) -> Result<Vec<CellSummary>> {
    let slots = load_ordered(store, region)?;
    let rows = slots
        .iter()
        .zip(region.coords())
        .map_while(|(slot, coord)| {
            let value = slot.as_deref()?;
            let (escaped, payload) = match value.strip_prefix(ESCAPE_MARKER) {
                Some(rest) => (true, rest),
                None => (false, value),
            };
            Some(CellSummary {
                coord,
                len: value.chars().count(),
                preview: preview(payload),
                escaped,
            })
        })
        .collect();
    Ok(rows)
}
