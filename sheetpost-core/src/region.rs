//! Cell coordinates and the rectangular region data is placed into.
//!
//! Coordinates are **1-based**: `Coord { row: 1, col: 1 }` is `A1`.
//! A [`GridRegion`] defines the placement order shared by the write and
//! read paths: column-major, every row of a column is filled before the
//! next column starts.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Largest region accepted, in cells. Hosted spreadsheets cap a whole
/// workbook at 10 million cells, and placement keeps one slot per cell.
pub const MAX_REGION_CELLS: usize = 10_000_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1 notation, e.g. `A1`, `BC32`.
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_name(self.col), self.row)
    }

    /// Parse an A1 reference such as `B7` or `$B$7`.
    pub fn from_a1(a1: &str) -> Result<Self> {
        let s = a1.trim();
        let bytes = s.as_bytes();
        let mut idx = 0usize;
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(bad_ref(s, "missing column"));
        }
        let col = name_to_col(&s[col_start..idx]).ok_or_else(|| bad_ref(s, "invalid column"))?;

        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }
        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start {
            return Err(bad_ref(s, "missing row"));
        }
        if idx != bytes.len() {
            return Err(bad_ref(s, "trailing characters"));
        }
        let row: u32 = s[row_start..idx]
            .parse()
            .map_err(|_| bad_ref(s, "invalid row"))?;
        if row == 0 {
            return Err(bad_ref(s, "rows start at 1"));
        }
        Ok(Self { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// A bounded rectangle of cells, addressed in placement order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridRegion {
    origin: Coord,
    rows: u32,
    cols: u32,
}

impl GridRegion {
    pub fn new(origin: Coord, rows: u32, cols: u32) -> Result<Self> {
        if origin.row == 0 || origin.col == 0 {
            return Err(SheetError::InvalidLayout(format!(
                "region origin ({}, {}) must be 1-based",
                origin.row, origin.col
            )));
        }
        if rows == 0 || cols == 0 {
            return Err(SheetError::InvalidLayout(format!(
                "region must have at least one row and column, got {rows}x{cols}"
            )));
        }
        let fits = origin.row.checked_add(rows - 1).is_some()
            && origin.col.checked_add(cols - 1).is_some();
        if !fits {
            return Err(SheetError::InvalidLayout(format!(
                "region {rows}x{cols} at {origin} overflows the grid"
            )));
        }
        let cells = u64::from(rows) * u64::from(cols);
        if cells > MAX_REGION_CELLS as u64 {
            return Err(SheetError::InvalidLayout(format!(
                "region {rows}x{cols} holds {cells} cells, max is {MAX_REGION_CELLS}"
            )));
        }
        Ok(Self { origin, rows, cols })
    }

    /// Parse `A1:B1000` (corners in either order) or a single cell `C3`.
    pub fn from_a1(a1: &str) -> Result<Self> {
        let s = a1.trim();
        let (a, b) = match s.split_once(':') {
            Some((a, b)) => (Coord::from_a1(a)?, Coord::from_a1(b)?),
            None => {
                let c = Coord::from_a1(s)?;
                (c, c)
            }
        };
        let origin = Coord::new(a.row.min(b.row), a.col.min(b.col));
        let end = Coord::new(a.row.max(b.row), a.col.max(b.col));
        Self::new(
            origin,
            end.row - origin.row + 1,
            end.col - origin.col + 1,
        )
    }

    #[inline]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Bottom-right corner.
    pub fn end(&self) -> Coord {
        Coord::new(
            self.origin.row + (self.rows - 1),
            self.origin.col + (self.cols - 1),
        )
    }

    /// Number of cells in the region.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Always false; a region holds at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, c: Coord) -> bool {
        let end = self.end();
        c.row >= self.origin.row && c.row <= end.row && c.col >= self.origin.col && c.col <= end.col
    }

    /// Coordinate of the `index`-th cell in placement order.
    pub fn coord_at(&self, index: usize) -> Option<Coord> {
        if index >= self.len() {
            return None;
        }
        let rows = self.rows as usize;
        Some(Coord::new(
            self.origin.row + (index % rows) as u32,
            self.origin.col + (index / rows) as u32,
        ))
    }

    /// Inverse of [`GridRegion::coord_at`].
    pub fn index_of(&self, c: Coord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        let col_off = (c.col - self.origin.col) as usize;
        let row_off = (c.row - self.origin.row) as usize;
        Some(col_off * self.rows as usize + row_off)
    }

    /// All coordinates in placement order.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        (0..self.len()).filter_map(move |i| self.coord_at(i))
    }
}

impl Default for GridRegion {
    /// `A1:B1000`
    fn default() -> Self {
        Self {
            origin: Coord::new(1, 1),
            rows: 1000,
            cols: 2,
        }
    }
}

impl fmt::Display for GridRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin, self.end())
    }
}

impl TryFrom<String> for GridRegion {
    type Error = SheetError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_a1(&s)
    }
}

impl From<GridRegion> for String {
    fn from(r: GridRegion) -> Self {
        r.to_string()
    }
}

fn bad_ref(s: &str, why: &str) -> SheetError {
    SheetError::InvalidLayout(format!("bad A1 reference {s:?}: {why}"))
}

fn col_to_name(col: u32) -> String {
    let mut n = col;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn name_to_col(s: &str) -> Option<u32> {
    let mut col: u32 = 0;
    for b in s.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    (col > 0).then_some(col)
}
