use std::{
    fs,
    path::{Path, PathBuf},
};

use engine::Bill;

use crate::{
    BillStore, Result, STORAGE_KEY,
    record::{decode_blob, encode_blob},
};

/// Stores the collection as `<dir>/bill_keeper_lkr_data.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BillStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Bill>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no store at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let bills = decode_blob(&content)?;
        tracing::debug!("loaded {} bills from {}", bills.len(), self.path.display());
        Ok(bills)
    }

    /// Writes to a sibling temp file first, then renames it over the store,
    /// so a crash mid-write never leaves a truncated blob.
    fn save(&mut self, bills: &[Bill]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = encode_blob(bills)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;
        tracing::debug!("saved {} bills to {}", bills.len(), self.path.display());
        Ok(())
    }
}
