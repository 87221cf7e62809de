pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use sheetpost_core::error::Result;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Put {
            grid,
            input,
            range,
            chunk_size,
            batch_size,
            cell_limit,
        } => handlers::handle_put(
            grid, input, range, chunk_size, batch_size, cell_limit, cli.json,
        ),
        Commands::Get {
            grid,
            out,
            range,
            expect_blake3_hex,
        } => handlers::handle_get(grid, out, range, expect_blake3_hex, cli.json),
        Commands::Wipe {
            grid,
            range,
            batch_size,
        } => handlers::handle_wipe(grid, range, batch_size, cli.json),
        Commands::Cells { grid, range } => handlers::handle_cells(grid, range, cli.json),
        Commands::Stat { grid, range } => handlers::handle_stat(grid, range, cli.json),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
