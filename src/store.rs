//! Table store ports and shared store types.
//!
//! This module defines the two traits the import/export workflow is written
//! against:
//!
//! - [`Table`] - a handle to one table: batched puts, point reads with a
//!   consistency mode, single-item puts, and the native query/scan filters.
//! - [`TableStore`] - the administrative surface: create-if-absent, describe,
//!   provisioned-throughput updates, and handle lookup.
//!
//! The workflow never creates or destroys a table handle itself; it receives
//! one and shares it across the writer workers and the validator. The embedded
//! engine in [`memory`] implements both traits; a networked backend can slot in
//! behind the same ports.

pub mod memory;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A stored item: attribute name to string value.
pub type Item = HashMap<String, String>;

/// Maximum number of items the batch-write primitive accepts per call.
pub const MAX_BATCH_ITEMS: usize = 25;

/// Composite key values identifying one item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    pub partition: String,
    pub sort: String,
}

/// The column names a table is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub partition_key: String,
    pub sort_key: String,
}

impl KeySchema {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// Extract the composite key of `item`. Both key attributes must be
    /// present and non-empty.
    pub fn key_of(&self, item: &Item) -> Result<Key, StoreError> {
        let partition = item
            .get(&self.partition_key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StoreError::MissingKey(self.partition_key.clone()))?;
        let sort = item
            .get(&self.sort_key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StoreError::MissingKey(self.sort_key.clone()))?;
        Ok(Key {
            partition: partition.clone(),
            sort: sort.clone(),
        })
    }
}

/// Read consistency for point lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    /// Reflects all prior completed writes.
    Strong,
    /// May lag behind recent writes.
    Eventual,
}

/// Provisioned capacity units for a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub read_units: u64,
    pub write_units: u64,
}

impl Throughput {
    /// Capacity a table is created with for the duration of a bulk import.
    pub const BULK_IMPORT: Throughput = Throughput {
        read_units: 100,
        write_units: 300,
    };

    /// Capacity a table is lowered to once the import completes.
    pub const IDLE: Throughput = Throughput {
        read_units: 5,
        write_units: 5,
    };
}

/// Snapshot of a table's administrative state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableDescription {
    pub name: String,
    pub key_schema: KeySchema,
    pub throughput: Throughput,
    pub item_count: usize,
}

/// Result of [`TableStore::create_table_if_absent`]. A name collision is a
/// choice point for the caller, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Errors surfaced by the store ports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table {0:?} already exists")]
    TableExists(String),

    #[error("table {0:?} does not exist")]
    TableNotFound(String),

    #[error("batch of {0} items exceeds the 25-item batch write limit")]
    BatchTooLarge(usize),

    #[error("item is missing a value for key column {0:?}")]
    MissingKey(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Handle to one table. Shared read/write across the writer workers and the
/// validator, so implementations must be thread-safe.
pub trait Table: Send + Sync {
    fn name(&self) -> &str;

    fn key_schema(&self) -> &KeySchema;

    /// Write up to [`MAX_BATCH_ITEMS`] items in one call. Items carrying the
    /// same composite key within a call are collapsed, last write wins.
    /// Returns the number of distinct items written.
    fn batch_put(&self, items: &[Item]) -> Result<usize, StoreError>;

    /// Single-item put, replacing any existing item with the same key.
    fn put(&self, item: &Item) -> Result<(), StoreError>;

    /// Point read by composite key.
    fn get(&self, key: &Key, consistency: Consistency) -> Result<Option<Item>, StoreError>;

    /// All items whose partition key equals `partition_value`, ordered by
    /// sort key.
    fn query_eq(&self, partition_value: &str) -> Result<Vec<Item>, StoreError>;

    /// All items whose `attribute` value lies in `[low, high]` (inclusive,
    /// lexicographic - ISO-8601 timestamps order correctly under this).
    fn scan_between(
        &self,
        attribute: &str,
        low: &str,
        high: &str,
    ) -> Result<Vec<Item>, StoreError>;

    /// Full unfiltered scan.
    fn scan(&self) -> Result<Vec<Item>, StoreError>;
}

/// Administrative surface of the store.
pub trait TableStore: Send + Sync {
    /// Create `name` unless a table with that name exists. The collision case
    /// is reported through [`CreateOutcome`], never as an error.
    fn create_table_if_absent(
        &self,
        name: &str,
        key_schema: KeySchema,
        throughput: Throughput,
    ) -> Result<CreateOutcome, StoreError>;

    /// Recover a table's key schema and capacity settings.
    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError>;

    /// Adjust provisioned capacity, e.g. lowering it after a bulk import.
    fn update_throughput(&self, name: &str, throughput: Throughput) -> Result<(), StoreError>;

    /// Obtain a handle to an existing table.
    fn table(&self, name: &str) -> Result<Arc<dyn Table>, StoreError>;
}
