//! Persistence for the bill collection.
//!
//! The whole collection is stored as one JSON blob under a fixed key. The
//! shell calls [`BillStore::load`] once at start-up and [`BillStore::save`]
//! after every change; the engine never touches storage.
//!
//! Loading is defensive: records written by older versions or edited by hand
//! are repaired into valid bills (see [`record`]) and every repair is logged.

use engine::Bill;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

mod error;
mod file;
mod memory;
pub mod record;

/// Fixed key the bill collection is stored under.
pub const STORAGE_KEY: &str = "bill_keeper_lkr_data";

/// Load/save the full bill collection.
pub trait BillStore {
    /// Returns every stored bill; an empty store yields an empty collection.
    fn load(&self) -> Result<Vec<Bill>>;

    /// Replaces the stored collection with `bills`.
    fn save(&mut self, bills: &[Bill]) -> Result<()>;
}
