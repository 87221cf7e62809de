use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

use sheetpost_core::error::Result;
use sheetpost_core::store::{GridStore, OpenParams};
use sheetpost_core::store_factory::{Backend, open_store};
use sheetpost_core::util::hex::parse_hex_array;
use sheetpost_core::{GridRegion, PostOptions, get_blob, get_file, inspect, put_file, wipe};

fn store_from_args(
    grid: PathBuf,
    cell_limit: Option<usize>,
    create: bool,
) -> Result<Box<dyn GridStore>> {
    let params = OpenParams {
        grid_path: grid,
        cell_limit,
        create,
    };
    open_store(Backend::File, params)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

pub fn handle_put(
    grid: PathBuf,
    input: PathBuf,
    range: String,
    chunk_size: NonZeroUsize,
    batch_size: NonZeroUsize,
    cell_limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let region = GridRegion::from_a1(&range)?;
    let mut store = store_from_args(grid, cell_limit, true)?;
    let opts = PostOptions {
        chunk_capacity: chunk_size,
        batch_size,
    };
    let report = put_file(store.as_mut(), &region, &input, &opts)?;
    if json {
        return print_json(&json!({ "region": region, "options": opts, "report": report }));
    }
    let last = report
        .placement
        .last
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {} bytes  {} cells (last {})  blake3={}",
        report.name,
        report.blob_len,
        report.placement.chunks,
        last,
        report.digest_hex()
    );
    Ok(())
}

pub fn handle_get(
    grid: PathBuf,
    out: PathBuf,
    range: String,
    expect_blake3_hex: Option<String>,
    json: bool,
) -> Result<()> {
    let region = GridRegion::from_a1(&range)?;
    let expect = expect_blake3_hex
        .map(|h| parse_hex_array::<32>(&h))
        .transpose()?;
    let store = store_from_args(grid, None, false)?;
    let report = get_file(store.as_ref(), &region, &out, expect.as_ref())?;
    if json {
        return print_json(&report);
    }
    let saved = report.saved_to.as_deref().unwrap_or(out.as_path());
    println!(
        "{}  {} bytes  from {} cells  blake3={}",
        saved.display(),
        report.blob_len,
        report.cells_read,
        report.digest_hex()
    );
    Ok(())
}

pub fn handle_wipe(
    grid: PathBuf,
    range: String,
    batch_size: NonZeroUsize,
    json: bool,
) -> Result<()> {
    let region = GridRegion::from_a1(&range)?;
    let mut store = store_from_args(grid, None, false)?;
    let opts = PostOptions {
        batch_size,
        ..Default::default()
    };
    let cleared = wipe(store.as_mut(), &region, &opts)?;
    if json {
        return print_json(&json!({ "region": region, "cleared": cleared }));
    }
    println!("cleared {cleared} cells in {region}");
    Ok(())
}

pub fn handle_cells(grid: PathBuf, range: String, json: bool) -> Result<()> {
    let region = GridRegion::from_a1(&range)?;
    let store = store_from_args(grid, None, false)?;
    let rows = inspect(store.as_ref(), &region)?;
    if json {
        return print_json(&rows);
    }
    for row in rows {
        println!(
            "{:<8} len={:<6} {} {:?}",
            row.coord.to_string(),
            row.len,
            if row.escaped { "'" } else { "!" },
            row.preview
        );
    }
    Ok(())
}

pub fn handle_stat(grid: PathBuf, range: String, json: bool) -> Result<()> {
    let region = GridRegion::from_a1(&range)?;
    let store = store_from_args(grid, None, false)?;
    let (_, report) = get_blob(store.as_ref(), &region)?;
    if json {
        return print_json(&json!({ "region": region, "report": report }));
    }
    println!("name:   {}", report.name);
    println!("mode:   {:o}", report.mode);
    println!("size:   {} bytes", report.blob_len);
    println!("framed: {} chars", report.framed_len);
    println!("cells:  {} in {region}", report.cells_read);
    println!("blake3: {}", report.digest_hex());
    Ok(())
}
