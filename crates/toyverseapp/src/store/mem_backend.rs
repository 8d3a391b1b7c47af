use super::backend::TableBackend;
use super::Tables;
use crate::error::{Result, ToyverseError};
use std::cell::RefCell;

/// In-memory table backend for testing.
///
/// Uses `RefCell` for interior mutability since the catalog is single-threaded.
/// This keeps `TableBackend` on `&self` without paying for a lock.
#[derive(Default)]
pub struct MemBackend {
    tables: RefCell<Tables>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl TableBackend for MemBackend {
    fn load_tables(&self) -> Result<Tables> {
        Ok(self.tables.borrow().clone())
    }

    fn save_tables(&self, tables: &Tables) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ToyverseError::Store("Simulated write error".to_string()));
        }
        *self.tables.borrow_mut() = tables.clone();
        Ok(())
    }
}
