//! Parallel shard dispatch.
//!
//! The record sequence is split into exactly [`SHARD_COUNT`] contiguous
//! shards - a complete, non-overlapping cover of the input - and one worker
//! per shard runs the batch writer concurrently. The dispatcher is a join
//! point: it returns only after every worker has terminated, and it returns
//! captured outcome text rather than letting a worker's failure escape.

use crate::record::Record;
use crate::store::Table;
use crate::write::write_shard;
use rayon::prelude::*;

/// Fixed worker fan-out.
pub const SHARD_COUNT: usize = 3;

/// Delimiter joining per-shard outcomes into the audit string.
pub const OUTCOME_DELIMITER: &str = ",";

/// Split `[0, len)` into exactly `parts` contiguous ranges as
/// `(shard_idx, start, end)`.
///
/// The remainder is spread over the leading shards, so shard sizes differ by
/// at most one. Trailing shards may be empty when `len < parts`; empty shards
/// are kept so the shard count - and the outcome string's shape - stays fixed.
pub fn split_shards(len: usize, parts: usize) -> Vec<(usize, usize, usize)> {
    let parts = parts.max(1);
    let base = len / parts;
    let rem = len % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0usize;
    for idx in 0..parts {
        let extra = if idx < rem { 1 } else { 0 };
        let end = start + base + extra;
        out.push((idx, start, end));
        start = end;
    }
    out
}

/// Write `records` through [`SHARD_COUNT`] concurrent workers and return the
/// joined per-shard outcome string.
///
/// Workers share the table handle but own their record slices exclusively.
/// Outcomes come back in shard order regardless of scheduling.
pub fn dispatch_write(table: &dyn Table, records: &[Record]) -> String {
    tracing::info!(
        rows = records.len(),
        shards = SHARD_COUNT,
        table = table.name(),
        "beginning csv import"
    );
    let outcomes: Vec<String> = split_shards(records.len(), SHARD_COUNT)
        .into_par_iter()
        .map(|(idx, start, end)| {
            write_shard(table, &records[start..end], &format!("shard-{}", idx + 1))
        })
        .collect();
    outcomes.join(OUTCOME_DELIMITER)
}
