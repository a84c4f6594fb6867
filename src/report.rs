//! Delimited output: the import status report and query/scan exports.
//!
//! A failed report write is fatal to the run - the status file is the sole
//! audit trail of an import, so there is nothing sensible to fall back to.

use crate::record::{
    ColumnSchema, ERROR_CODE_COLUMN, ERROR_DESCRIPTION_COLUMN, Record, STATUS_COLUMN,
};
use crate::store::Item;
use anyhow::{Context, Result, bail};
use csv::WriterBuilder;
use std::fs::{File, create_dir_all};
use std::path::Path;

/// Write the annotated record set to `path`: one header row in `schema`
/// order, then one row per record.
///
/// `schema` is expected to be the extended output schema; the three audit
/// columns are served from the record's status fields, everything else from
/// its data fields (empty when absent).
///
/// Returns the number of data rows written.
pub fn write_status_report(
    path: impl AsRef<Path>,
    schema: &ColumnSchema,
    records: &[Record],
) -> Result<usize> {
    let path = path.as_ref();
    let mut wtr = open_writer(path)?;
    wtr.write_record(schema.columns())
        .with_context(|| format!("write header of {}", path.display()))?;
    for (idx, record) in records.iter().enumerate() {
        let row: Vec<&str> = schema
            .columns()
            .iter()
            .map(|column| match column.as_str() {
                STATUS_COLUMN => record.status.as_str(),
                ERROR_CODE_COLUMN => record.error_code.as_str(),
                ERROR_DESCRIPTION_COLUMN => record.error_description.as_str(),
                name => record.get(name).unwrap_or(""),
            })
            .collect();
        wtr.write_record(&row)
            .with_context(|| format!("write row #{} of {}", idx + 1, path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    tracing::info!(rows = records.len(), file = %path.display(), "status report written");
    Ok(records.len())
}

/// Alphabetically sorted attribute names of a query/scan result.
///
/// The store returns uniform items, so the first item's attributes name the
/// export's columns. An empty result is an error: there is nothing to derive
/// a header from, and an empty export file would be misleading.
pub fn sorted_columns(items: &[Item]) -> Result<Vec<String>> {
    let Some(first) = items.first() else {
        bail!("no items matched; nothing to export");
    };
    let mut columns: Vec<String> = first.keys().cloned().collect();
    columns.sort();
    Ok(columns)
}

/// Write query/scan result items to `path` under the given column order.
/// Returns the number of data rows written.
pub fn export_items(path: impl AsRef<Path>, columns: &[String], items: &[Item]) -> Result<usize> {
    let path = path.as_ref();
    let mut wtr = open_writer(path)?;
    wtr.write_record(columns)
        .with_context(|| format!("write header of {}", path.display()))?;
    for (idx, item) in items.iter().enumerate() {
        let row: Vec<&str> = columns
            .iter()
            .map(|column| item.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        wtr.write_record(&row)
            .with_context(|| format!("write row #{} of {}", idx + 1, path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    tracing::info!(rows = items.len(), file = %path.display(), "export written");
    Ok(items.len())
}

fn open_writer(path: &Path) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(WriterBuilder::new().from_writer(file))
}
