//! Batched shard writes.
//!
//! A shard is written through the store's native batch primitive in chunks of
//! at most [`MAX_BATCH_ITEMS`], with intra-chunk duplicate keys collapsed
//! (last write wins) before the call goes out. Any failure aborts the rest of
//! the shard and is captured as text - retries belong to the post-write
//! validation pass, not here.

use crate::record::Record;
use crate::store::{Item, Key, KeySchema, MAX_BATCH_ITEMS, StoreError, Table};

/// Write `shard` to `table`, returning the shard's write outcome.
///
/// The outcome is an opaque provenance string: a success tag naming the shard,
/// or the captured error text of the chunk that failed. It is propagated into
/// the audit trail by the validator, never interpreted.
pub fn write_shard(table: &dyn Table, shard: &[Record], shard_name: &str) -> String {
    match try_write_shard(table, shard) {
        Ok(written) => {
            tracing::info!(shard = shard_name, items = written, "shard write complete");
            format!("no error in {shard_name}")
        }
        Err(err) => {
            tracing::error!(shard = shard_name, error = %err, "shard write aborted");
            err.to_string()
        }
    }
}

fn try_write_shard(table: &dyn Table, shard: &[Record]) -> Result<usize, StoreError> {
    let schema = table.key_schema();
    let mut written = 0;
    for chunk in shard.chunks(MAX_BATCH_ITEMS) {
        let items = dedup_chunk(schema, chunk)?;
        written += table.batch_put(&items)?;
    }
    Ok(written)
}

/// Collapse duplicate composite keys within one chunk, keeping the last
/// occurrence's values in the first occurrence's position.
fn dedup_chunk(schema: &KeySchema, chunk: &[Record]) -> Result<Vec<Item>, StoreError> {
    let mut seen: Vec<Key> = Vec::with_capacity(chunk.len());
    let mut items: Vec<Item> = Vec::with_capacity(chunk.len());
    for record in chunk {
        let key = record.composite_key(schema)?;
        match seen.iter().position(|k| *k == key) {
            Some(at) => items[at] = record.to_item(),
            None => {
                seen.push(key);
                items.push(record.to_item());
            }
        }
    }
    Ok(items)
}
