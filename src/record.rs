//! Records and column schemas.
//!
//! A [`Record`] is one CSV data row: an attribute map plus the three audit
//! fields appended at load time. The audit fields start unset, are filled in
//! by the post-write validator, and are persisted by the status report.

use crate::store::{Item, Key, KeySchema, StoreError};

/// Name of the audit column carrying the per-record outcome.
pub const STATUS_COLUMN: &str = "Success/Failure";
/// Name of the audit column carrying the error code ("0" = clean).
pub const ERROR_CODE_COLUMN: &str = "Error Code";
/// Name of the audit column carrying free-text error detail.
pub const ERROR_DESCRIPTION_COLUMN: &str = "Error Description";

/// Error code value for a record that validated cleanly.
pub const ERROR_CODE_NONE: &str = "0";
/// Error code value for a record that missed validation.
pub const ERROR_CODE_FAILED: &str = "1";

/// Per-record write outcome, unset until the validator runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteStatus {
    #[default]
    Unset,
    Success,
    Failure,
}

impl WriteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WriteStatus::Unset => "",
            WriteStatus::Success => "Success",
            WriteStatus::Failure => "Failure",
        }
    }
}

/// One data row with its audit annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    fields: Item,
    pub status: WriteStatus,
    pub error_code: String,
    pub error_description: String,
}

impl Record {
    pub fn new(fields: Item) -> Self {
        Self {
            fields,
            status: WriteStatus::Unset,
            error_code: ERROR_CODE_NONE.to_string(),
            error_description: String::new(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// The item as written to the store: data columns only, audit columns are
    /// report-side state and never persisted to the table.
    pub fn to_item(&self) -> Item {
        self.fields.clone()
    }

    /// Composite key of this record under `schema`.
    pub fn composite_key(&self, schema: &KeySchema) -> Result<Key, StoreError> {
        schema.key_of(&self.fields)
    }

    pub fn mark_success(&mut self) {
        self.status = WriteStatus::Success;
        self.error_code = ERROR_CODE_NONE.to_string();
        self.error_description.clear();
    }

    pub fn mark_failure(&mut self, description: String) {
        self.status = WriteStatus::Failure;
        self.error_code = ERROR_CODE_FAILED.to_string();
        self.error_description = description;
    }
}

/// Ordered column names. Immutable after load; defines output field order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// The output schema: input columns followed by the three audit columns.
    pub fn with_status_columns(&self) -> ColumnSchema {
        let mut columns = self.columns.clone();
        columns.push(STATUS_COLUMN.to_string());
        columns.push(ERROR_CODE_COLUMN.to_string());
        columns.push(ERROR_DESCRIPTION_COLUMN.to_string());
        ColumnSchema::new(columns)
    }
}
