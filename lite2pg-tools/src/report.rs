use crate::models::TableDescriptor;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a schema run. Purely informational, nothing in here affects the generated DDL.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub database: String,
    pub generated_at: DateTime<Utc>,
    pub total_tables: usize,
    pub tables: Vec<TableSummary>,
    pub failures: Vec<TableFailure>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TableSummary {
    pub table_name: String,
    pub column_count: usize,
    pub foreign_key_count: usize,
    pub index_count: usize,
    /// Only collected when asked for, and left empty if counting failed.
    pub row_count: Option<u64>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TableFailure {
    pub table_name: String,
    pub reason: String,
}

impl SchemaReport {
    pub fn new(database: &str, total_tables: usize) -> Self {
        SchemaReport {
            database: database.to_string(),
            generated_at: Utc::now(),
            total_tables,
            tables: Vec::with_capacity(total_tables),
            failures: vec![],
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl TableSummary {
    pub fn from_table(table: &TableDescriptor, row_count: Option<u64>) -> Self {
        TableSummary {
            table_name: table.name.clone(),
            column_count: table.columns.len(),
            foreign_key_count: table.foreign_keys.len(),
            index_count: table.indexes.len(),
            row_count,
        }
    }
}
