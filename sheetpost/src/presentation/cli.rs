use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Store files in a grid of text cells", long_about = None)]
pub struct Cli {
    /// Log every cell touched (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a file and place it into the grid, replacing what was there
    Put {
        /// grid file (created if missing)
        grid: PathBuf,
        input: PathBuf,

        /// region to use, in A1 notation
        #[arg(long, default_value = "A1:B1000")]
        range: String,

        /// framed chars per cell, escape marker excluded
        #[arg(long, default_value = "49500")]
        chunk_size: NonZeroUsize,

        /// cells per store call
        #[arg(long, default_value = "100")]
        batch_size: NonZeroUsize,

        /// max chars per cell for a newly created grid
        #[arg(long)]
        cell_limit: Option<usize>,
    },

    /// Reassemble the stored file
    Get {
        grid: PathBuf,
        /// output file, or a directory to restore under the stored name
        out: PathBuf,

        #[arg(long, default_value = "A1:B1000")]
        range: String,

        /// 32-byte hex BLAKE3 digest the restored file must match
        #[arg(long = "expect-blake3")]
        expect_blake3_hex: Option<String>,
    },

    /// Clear the occupied cells at the start of the region
    Wipe {
        grid: PathBuf,

        #[arg(long, default_value = "A1:B1000")]
        range: String,

        #[arg(long, default_value = "100")]
        batch_size: NonZeroUsize,
    },

    /// List the occupied cells in placement order
    Cells {
        grid: PathBuf,

        #[arg(long, default_value = "A1:B1000")]
        range: String,
    },

    /// Decode the stored file and describe it without writing it out
    Stat {
        grid: PathBuf,

        #[arg(long, default_value = "A1:B1000")]
        range: String,
    },
}
