//! Trade data file store
//!
//! Reads an export of the browser's `tradeData` array from disk. The file is
//! re-read on every load so edits made outside the server show up on the next
//! request. Nothing is ever written back.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use shared::{decode_trade_data, LotRecord, RecordStore, StoreError};

/// Record store over a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    path: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileRecordStore {
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Trade data file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records = decode_trade_data(&json)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded trade data");
        Ok(records)
    }
}
