//! Embedded in-process table engine.
//!
//! [`MemoryStore`] implements both store ports over `RwLock`-guarded maps.
//! Items live in a `BTreeMap` keyed by composite key, so query results come
//! back ordered by sort key without extra work. Strong and eventual reads are
//! both served from the committed map; the distinction is carried in the API
//! so a networked backend can honor it.

use crate::store::{
    Consistency, CreateOutcome, Item, Key, KeySchema, MAX_BATCH_ITEMS, StoreError, Table,
    TableDescription, TableStore, Throughput,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// One table's state. Handles are cheap `Arc` clones of this.
pub struct MemoryTable {
    name: String,
    key_schema: KeySchema,
    throughput: RwLock<Throughput>,
    items: RwLock<BTreeMap<Key, Item>>,
}

impl MemoryTable {
    fn new(name: String, key_schema: KeySchema, throughput: Throughput) -> Self {
        Self {
            name,
            key_schema,
            throughput: RwLock::new(throughput),
            items: RwLock::new(BTreeMap::new()),
        }
    }

    fn describe(&self) -> TableDescription {
        TableDescription {
            name: self.name.clone(),
            key_schema: self.key_schema.clone(),
            throughput: *self.throughput.read().unwrap(),
            item_count: self.items.read().unwrap().len(),
        }
    }
}

impl Table for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    fn batch_put(&self, items: &[Item]) -> Result<usize, StoreError> {
        if items.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::BatchTooLarge(items.len()));
        }
        // Keys are extracted up front so a malformed item fails the whole
        // call before anything is committed.
        let mut keyed = Vec::with_capacity(items.len());
        for item in items {
            keyed.push((self.key_schema.key_of(item)?, item.clone()));
        }
        let mut distinct = HashSet::new();
        let mut map = self.items.write().unwrap();
        for (key, item) in keyed {
            distinct.insert(key.clone());
            map.insert(key, item);
        }
        Ok(distinct.len())
    }

    fn put(&self, item: &Item) -> Result<(), StoreError> {
        let key = self.key_schema.key_of(item)?;
        self.items.write().unwrap().insert(key, item.clone());
        Ok(())
    }

    fn get(&self, key: &Key, _consistency: Consistency) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().unwrap().get(key).cloned())
    }

    fn query_eq(&self, partition_value: &str) -> Result<Vec<Item>, StoreError> {
        let map = self.items.read().unwrap();
        Ok(map
            .iter()
            .filter(|(key, _)| key.partition == partition_value)
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn scan_between(
        &self,
        attribute: &str,
        low: &str,
        high: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let map = self.items.read().unwrap();
        Ok(map
            .values()
            .filter(|item| {
                item.get(attribute)
                    .is_some_and(|v| v.as_str() >= low && v.as_str() <= high)
            })
            .cloned()
            .collect())
    }

    fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().unwrap().values().cloned().collect())
    }
}

/// In-process store holding any number of tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Arc<MemoryTable>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryStore {
    fn create_table_if_absent(
        &self,
        name: &str,
        key_schema: KeySchema,
        throughput: Throughput,
    ) -> Result<CreateOutcome, StoreError> {
        let mut tables = self.tables.write().unwrap();
        if tables.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        tables.insert(
            name.to_string(),
            Arc::new(MemoryTable::new(name.to_string(), key_schema, throughput)),
        );
        Ok(CreateOutcome::Created)
    }

    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        let tables = self.tables.read().unwrap();
        let table = tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        Ok(table.describe())
    }

    fn update_throughput(&self, name: &str, throughput: Throughput) -> Result<(), StoreError> {
        let tables = self.tables.read().unwrap();
        let table = tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        *table.throughput.write().unwrap() = throughput;
        Ok(())
    }

    fn table(&self, name: &str) -> Result<Arc<dyn Table>, StoreError> {
        let tables = self.tables.read().unwrap();
        let table = tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        Ok(Arc::clone(table) as Arc<dyn Table>)
    }
}
