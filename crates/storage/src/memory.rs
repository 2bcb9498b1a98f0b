use engine::Bill;

use crate::{
    BillStore, Result,
    record::{decode_blob, encode_blob},
};

/// Keeps the serialized blob in memory. Goes through the same codec as the
/// file store, so repairs on load behave identically.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing blob, e.g. one written by an older version.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    #[must_use]
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl BillStore for MemoryStore {
    fn load(&self) -> Result<Vec<Bill>> {
        match &self.blob {
            Some(blob) => decode_blob(blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, bills: &[Bill]) -> Result<()> {
        self.blob = Some(encode_blob(bills)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::BillBook;

    use super::*;

    #[test]
    fn empty_store_loads_nothing() {
        assert!(MemoryStore::new().load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut book = BillBook::new();
        let id = book.create_bill(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        book.bill_mut(id)
            .unwrap()
            .add_participant("Dilini", None)
            .unwrap();

        let mut store = MemoryStore::new();
        store.save(book.bills()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), id);
        assert_eq!(loaded[0].participants()[0].name, "Dilini");
    }
}
