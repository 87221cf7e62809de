use crate::error::Result;
use crate::policy::DEFAULT_CELL_LIMIT;
use crate::store::{GridStore, OpenParams};
use crate::store_fs::FileGridStore;
use crate::store_mem::MemGridStore;

pub enum Backend {
    /// Throwaway grid; `grid_path` and `create` are ignored.
    Memory,
    File,
}

pub fn open_store(backend: Backend, p: OpenParams) -> Result<Box<dyn GridStore>> {
    match backend {
        Backend::Memory => Ok(Box::new(MemGridStore::new(
            p.cell_limit.unwrap_or(DEFAULT_CELL_LIMIT),
        ))),
        Backend::File => Ok(Box::new(FileGridStore::open(&p)?)),
    }
}
