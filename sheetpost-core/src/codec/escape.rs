use crate::error::{Result, SheetError};
use crate::region::Coord;

/// Spreadsheet services treat a leading apostrophe as "literal text", so
/// `=`, `+`, `-` or `@` at the start of a chunk are never evaluated.
pub const ESCAPE_MARKER: char = '\'';

pub fn escape(chunk: &str) -> String {
    let mut out = String::with_capacity(chunk.len() + 1);
    out.push(ESCAPE_MARKER);
    out.push_str(chunk);
    out
}

/// Strip the marker from a value read back from `coord`.
pub fn unescape(coord: Coord, value: &str) -> Result<&str> {
    value
        .strip_prefix(ESCAPE_MARKER)
        .ok_or(SheetError::CorruptCell { coord })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_like_chunks_survive() {
        let c = Coord::new(1, 1);
        for chunk in ["=SUM(A1:A3)", "+1", "-2", "@user", "'quoted", ""] {
            let stored = escape(chunk);
            assert!(stored.starts_with(ESCAPE_MARKER));
            assert_eq!(unescape(c, &stored).unwrap(), chunk);
        }
    }

    #[test]
    fn only_one_marker_is_stripped() {
        assert_eq!(unescape(Coord::new(1, 1), "''x").unwrap(), "'x");
    }

    #[test]
    fn missing_marker_is_corrupt() {
        let err = unescape(Coord::new(3, 2), "ABCD").unwrap_err();
        assert!(matches!(
            err,
            SheetError::CorruptCell { coord } if coord == Coord::new(3, 2)
        ));
    }
}
