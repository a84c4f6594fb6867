//! # csvferry
//!
//! Bulk CSV import into a DynamoDB-style key-value/document table, and CSV
//! export of query/scan results back out.
//!
//! The core workflow is **concurrent bulk write with post-write validation**:
//! the record set is split across a fixed fan-out of parallel workers, written
//! in bounded batches through the store's native batch primitive, then every
//! record is re-read with strong consistency to confirm durability. Records
//! found missing are re-inserted best-effort and flagged, and the whole set is
//! written back out as a per-record audit report.
//!
//! ## Quick Start
//!
//! ```ignore
//! use csvferry::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = MemoryStore::new();
//! let loaded = load_records("events.csv")?;
//!
//! store.create_table_if_absent(
//!     "events",
//!     KeySchema::new("id", "Time"),
//!     Throughput::BULK_IMPORT,
//! )?;
//! let table = store.table("events")?;
//!
//! let mut records = loaded.records;
//! let outcome = dispatch_write(table.as_ref(), &records);
//! validate_records(table.as_ref(), &mut records, &outcome);
//! write_status_report("import_status.csv", &loaded.output_schema, &records)?;
//!
//! store.update_throughput("events", Throughput::IDLE)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Data flow
//!
//! file → [`load`] → record sequence → [`dispatch`] → [`write`] (×3 shards,
//! concurrent) → shard outcomes → [`validate`] (sequential) → [`report`] →
//! status file.
//!
//! ## Module Overview
//!
//! - [`record`] - records, audit fields, and column schemas
//! - [`load`] - CSV ingestion and timestamp normalization
//! - [`store`] - the `Table`/`TableStore` ports and the embedded engine
//! - [`write`] - bounded batch writes with intra-chunk key dedup
//! - [`dispatch`] - three-way shard split and parallel fan-out/join
//! - [`validate`] - strongly-consistent read-validate-repair pass
//! - [`report`] - the status report and query/scan exports
//! - [`console`] / [`session`] - interactive dialogue and per-run context
//! - [`testing`] - fault-injecting table wrappers for tests

pub mod console;
pub mod dispatch;
pub mod load;
pub mod record;
pub mod report;
pub mod session;
pub mod store;
pub mod testing;
pub mod validate;
pub mod write;

// General re-exports
pub use dispatch::{OUTCOME_DELIMITER, SHARD_COUNT, dispatch_write, split_shards};
pub use load::{LoadedFile, load_records, normalize_timestamp, range_bound};
pub use record::{ColumnSchema, Record, WriteStatus};
pub use report::{export_items, sorted_columns, write_status_report};
pub use session::Session;
pub use store::memory::{MemoryStore, MemoryTable};
pub use store::{
    Consistency, CreateOutcome, Item, Key, KeySchema, MAX_BATCH_ITEMS, StoreError, Table,
    TableDescription, TableStore, Throughput,
};
pub use validate::{RepairOutcome, ValidationSummary, validate_records};
pub use write::write_shard;
