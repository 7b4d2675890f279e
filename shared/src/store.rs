//! Record store seam
//!
//! The calculator never touches storage directly; it is handed a
//! [`RecordStore`] that yields lot records in storage order. Stores are
//! read-only from the calculator's point of view.

use std::sync::Arc;

use thiserror::Error;

use crate::billing::quality_labels;
use crate::models::LotRecord;

/// Storage key the browser uses for lot records
pub const TRADE_DATA_KEY: &str = "tradeData";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed trade data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of lot records
pub trait RecordStore {
    /// All lot records in storage order; an empty store yields an empty list
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError>;

    /// Distinct non-empty quality labels in first-seen order
    fn load_quality_labels(&self) -> Result<Vec<String>, StoreError> {
        Ok(quality_labels(&self.load_lot_records()?))
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError> {
        (**self).load_lot_records()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError> {
        (**self).load_lot_records()
    }
}

/// Decode the `tradeData` JSON blob
///
/// A literal `null` (what a missing key serialises to) is an empty list.
pub fn decode_trade_data(json: &str) -> Result<Vec<LotRecord>, StoreError> {
    let records: Option<Vec<LotRecord>> = serde_json::from_str(json)?;
    Ok(records.unwrap_or_default())
}

/// Store backed by a vector held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<LotRecord>,
}

impl InMemoryStore {
    pub fn new(records: Vec<LotRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::new(decode_trade_data(json)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryStore {
    fn load_lot_records(&self) -> Result<Vec<LotRecord>, StoreError> {
        Ok(self.records.clone())
    }
}
