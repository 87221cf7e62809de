#![forbid(unsafe_code)]
//! Store arbitrary files in a grid of size-limited text cells.
//!
//! A file is uuencoded ([`codec::uu`]), cut into cell-sized chunks
//! ([`chunking::fixed`]) and laid out column by column over a
//! [`GridRegion`] ([`place`]). Reading walks the same order back, stops
//! at the first unused cell and decodes.
//!
//! ```
//! use sheetpost_core::store_mem::MemGridStore;
//! use sheetpost_core::{Frame, GridRegion, PostOptions, get_blob, put_blob};
//!
//! let mut grid = MemGridStore::default();
//! let region = GridRegion::default();
//! let frame = Frame::new("hello.bin", 0o644, vec![0, 159, 146, 150]).unwrap();
//! put_blob(&mut grid, &region, &frame, &PostOptions::default()).unwrap();
//!
//! let (back, _report) = get_blob(&grid, &region).unwrap();
//! assert_eq!(back, frame);
//! ```

pub mod error;
pub mod policy;

pub mod util {
    pub mod atomic;
    pub mod hash_forward;
    pub mod hex;
}

pub mod chunking {
    pub mod fixed;
}

pub mod codec;

pub mod domain;
pub mod region;
pub mod stats;

pub mod store;
pub mod store_factory;
pub mod store_fs;
pub mod store_mem;

pub mod inspect;
pub mod place;

// Re-exports: stable API surface
pub use codec::Frame;
pub use error::{Result, SheetError};
pub use inspect::inspect;
pub use place::get::{get_blob, get_file, read_text};
pub use place::put::{place_text, put_blob, put_file};
pub use place::wipe::wipe;
pub use policy::PostOptions;
pub use region::{Coord, GridRegion};
pub use stats::{GetReport, Placement, PutReport};
pub use store::{GridStore, OpenParams};
