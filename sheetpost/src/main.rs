mod application;
mod presentation;

use sheetpost_core::error::Result;

fn main() -> Result<()> {
    application::run()
}
