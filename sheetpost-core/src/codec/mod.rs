//! Text codecs between file bytes and cell strings.
//!
//! [`uu`] frames a whole blob as printable lines; [`escape`] guards each
//! stored chunk against being read back as a formula.

use crate::error::{Result, SheetError};

pub const DEFAULT_MODE: u32 = 0o644;
pub const MODE_MASK: u32 = 0o777;

/// A named blob as carried by framed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    name: String,
    mode: u32,
    data: Vec<u8>,
}

impl Frame {
    /// `name` ends up on the header line, so it must be a single non-empty line.
    pub fn new(name: impl Into<String>, mode: u32, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains(['\n', '\r']) {
            return Err(SheetError::InvalidLayout(format!(
                "blob name {name:?} must be a non-empty single line"
            )));
        }
        Ok(Self {
            name,
            mode: mode & MODE_MASK,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

pub mod escape;
pub mod uu;
