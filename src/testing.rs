//! Test support utilities.
//!
//! Fault-injecting [`Table`] wrappers let tests exercise the abort-and-capture
//! and read-repair paths without a real flaky backend, and the sample builders
//! produce uniform record sets for property-style tests.

use crate::record::Record;
use crate::store::{Consistency, Item, Key, KeySchema, StoreError, Table};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A table that silently drops selected keys during batch writes.
///
/// Single-item puts are delegated untouched, so a dropped record reappears
/// once the validator's read-repair re-inserts it.
pub struct LossyTable {
    inner: Arc<dyn Table>,
    dropped: HashSet<Key>,
}

impl LossyTable {
    pub fn new(inner: Arc<dyn Table>, dropped: impl IntoIterator<Item = Key>) -> Self {
        Self {
            inner,
            dropped: dropped.into_iter().collect(),
        }
    }
}

impl Table for LossyTable {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn key_schema(&self) -> &KeySchema {
        self.inner.key_schema()
    }

    fn batch_put(&self, items: &[Item]) -> Result<usize, StoreError> {
        let schema = self.inner.key_schema();
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if !self.dropped.contains(&schema.key_of(item)?) {
                kept.push(item.clone());
            }
        }
        self.inner.batch_put(&kept)
    }

    fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.inner.put(item)
    }

    fn get(&self, key: &Key, consistency: Consistency) -> Result<Option<Item>, StoreError> {
        self.inner.get(key, consistency)
    }

    fn query_eq(&self, partition_value: &str) -> Result<Vec<Item>, StoreError> {
        self.inner.query_eq(partition_value)
    }

    fn scan_between(
        &self,
        attribute: &str,
        low: &str,
        high: &str,
    ) -> Result<Vec<Item>, StoreError> {
        self.inner.scan_between(attribute, low, high)
    }

    fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.inner.scan()
    }
}

/// A table whose batch writes start failing after a set number of calls.
pub struct FaultyTable {
    inner: Arc<dyn Table>,
    fail_after: usize,
    batch_calls: AtomicUsize,
}

impl FaultyTable {
    /// Batch calls `0..fail_after` succeed; every later one errors.
    pub fn new(inner: Arc<dyn Table>, fail_after: usize) -> Self {
        Self {
            inner,
            fail_after,
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Number of batch-write calls attempted so far.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

impl Table for FaultyTable {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn key_schema(&self) -> &KeySchema {
        self.inner.key_schema()
    }

    fn batch_put(&self, items: &[Item]) -> Result<usize, StoreError> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_after {
            return Err(StoreError::Backend("injected batch write failure".into()));
        }
        self.inner.batch_put(items)
    }

    fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.inner.put(item)
    }

    fn get(&self, key: &Key, consistency: Consistency) -> Result<Option<Item>, StoreError> {
        self.inner.get(key, consistency)
    }

    fn query_eq(&self, partition_value: &str) -> Result<Vec<Item>, StoreError> {
        self.inner.query_eq(partition_value)
    }

    fn scan_between(
        &self,
        attribute: &str,
        low: &str,
        high: &str,
    ) -> Result<Vec<Item>, StoreError> {
        self.inner.scan_between(attribute, low, high)
    }

    fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.inner.scan()
    }
}

/// Key schema used by the sample builders: partition "id", sort "Time".
pub fn sample_key_schema() -> KeySchema {
    KeySchema::new("id", "Time")
}

/// Build `n` records with distinct ids, ISO timestamps, and a value column.
pub fn sample_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let mut fields = Item::new();
            fields.insert("id".to_string(), format!("id-{i:04}"));
            fields.insert(
                "Time".to_string(),
                format!("2019-04-16T{:02}:{:02}:00", 9 + (i / 60) % 12, i % 60),
            );
            fields.insert("value".to_string(), format!("v{i}"));
            Record::new(fields)
        })
        .collect()
}
