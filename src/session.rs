//! Per-run session context.
//!
//! Everything an interactive turn needs - file paths, schemas, key column
//! names, the table name - is gathered once at startup into a [`Session`] and
//! passed by reference, instead of living in shared mutable state.

use crate::record::ColumnSchema;
use crate::store::KeySchema;
use std::path::PathBuf;

/// Immutable context for one run of the tool.
#[derive(Clone, Debug)]
pub struct Session {
    /// Source CSV file.
    pub csv_path: PathBuf,
    /// Target table name.
    pub table_name: String,
    /// Key column names chosen from the input header.
    pub key_schema: KeySchema,
    /// Input columns, in header order.
    pub schema: ColumnSchema,
    /// Input columns plus the audit columns; the status report's field order.
    pub output_schema: ColumnSchema,
    /// Where the import status report is written.
    pub report_path: PathBuf,
    /// Where query/scan exports are written.
    pub export_path: PathBuf,
}
