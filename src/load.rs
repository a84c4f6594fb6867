//! CSV ingestion.
//!
//! Reads a delimited file into a uniform record sequence: the first row is the
//! header, remaining rows map positionally onto it. A column whose name
//! matches "time" case-insensitively is normalized to an ISO-8601 timestamp;
//! every other cell is copied verbatim. Load errors are fatal to the run - no
//! partial record set is ever returned.

use crate::record::{ColumnSchema, Record};
use crate::store::Item;
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::Path;

/// Column name (matched case-insensitively) that gets timestamp normalization.
pub const TIME_COLUMN: &str = "time";

const DASHED_FORMAT: &str = "%d-%m-%y %H:%M";
const SLASHED_FORMAT: &str = "%d/%m/%y %H:%M";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Result of loading one CSV file.
pub struct LoadedFile {
    /// Input columns, in header order.
    pub schema: ColumnSchema,
    /// Input columns plus the three audit columns; the status report's order.
    pub output_schema: ColumnSchema,
    pub records: Vec<Record>,
}

/// Load `path` into records.
///
/// Rows whose field count disagrees with the header are rejected outright
/// (the reader is run in strict mode), as is any unparseable value in the
/// time column. Empty header cells - trailing commas in the header line -
/// are dropped, and their positions skipped in every row.
pub fn load_records(path: impl AsRef<Path>) -> Result<LoadedFile> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let headers = rdr
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .clone();
    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(pos, name)| (pos, name.to_string()))
        .collect();
    if columns.is_empty() {
        bail!("{}: header row has no usable column names", path.display());
    }

    let schema = ColumnSchema::new(columns.iter().map(|(_, name)| name.clone()).collect());
    let output_schema = schema.with_status_columns();

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        // Line number as a human would count it: header is line 1.
        let line = idx + 2;
        let row = row.with_context(|| format!("{}: parse CSV line {line}", path.display()))?;
        let mut fields = Item::with_capacity(columns.len());
        for (pos, name) in &columns {
            let raw = row
                .get(*pos)
                .with_context(|| format!("{}: line {line} has no field for column {name:?}", path.display()))?;
            let value = if name.eq_ignore_ascii_case(TIME_COLUMN) {
                normalize_timestamp(raw)
                    .with_context(|| format!("{}: line {line}, column {name:?}", path.display()))?
            } else {
                raw.to_string()
            };
            fields.insert(name.clone(), value);
        }
        records.push(Record::new(fields));
    }

    tracing::info!(rows = records.len(), file = %path.display(), "csv loaded");
    Ok(LoadedFile {
        schema,
        output_schema,
        records,
    })
}

/// Normalize a time cell to ISO-8601.
///
/// Tries the two-digit-year dashed format first, then the slashed variant,
/// mirroring the formats bulk exports arrive in.
pub fn normalize_timestamp(raw: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(raw, DASHED_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, SLASHED_FORMAT))
        .with_context(|| {
            format!("unparseable timestamp {raw:?} (expected dd-mm-yy HH:MM or dd/mm/yy HH:MM)")
        })?;
    Ok(parsed.format(ISO_FORMAT).to_string())
}

/// Normalize a user-entered range bound for scanning.
///
/// Bounds entered as `dd/mm/yy HH:MM` are converted to ISO-8601 so they
/// compare against stored timestamps; anything else passes through verbatim
/// and only fails to match downstream.
pub fn range_bound(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw.trim(), SLASHED_FORMAT)
        .map(|dt| dt.format(ISO_FORMAT).to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}
