use crate::source::{RawColumn, RawForeignKey, RawIndex, SchemaSource, SqliteSource};
use crate::{Lite2PgError, Result};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};

/// Creates an in memory SQLite database and runs the given script against it.
///
/// Panics if the script fails, to keep the tests short.
pub fn sqlite_source(script: &str) -> SqliteSource {
    let connection = Connection::open_in_memory().expect("Failed to open in memory database");
    connection
        .execute_batch(script)
        .expect("Failed to run setup script");

    SqliteSource::from_connection(connection, ":memory:")
}

/// A source that serves canned rows, with the option of failing selected tables.
#[derive(Default)]
pub struct FakeSource {
    pub tables: Vec<String>,
    pub columns: HashMap<String, Vec<RawColumn>>,
    pub foreign_keys: HashMap<String, Vec<RawForeignKey>>,
    pub indexes: HashMap<String, Vec<RawIndex>>,
    pub row_counts: HashMap<String, u64>,
    pub failing_tables: HashSet<String>,
}

impl FakeSource {
    pub fn with_table(mut self, table: &str, columns: Vec<RawColumn>) -> Self {
        self.tables.push(table.to_string());
        self.columns.insert(table.to_string(), columns);
        self
    }

    pub fn with_indexes(mut self, table: &str, indexes: Vec<RawIndex>) -> Self {
        self.indexes.insert(table.to_string(), indexes);
        self
    }

    pub fn with_foreign_keys(mut self, table: &str, foreign_keys: Vec<RawForeignKey>) -> Self {
        self.foreign_keys.insert(table.to_string(), foreign_keys);
        self
    }

    pub fn failing(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_string());
        self
    }

    fn check_access(&self, table: &str) -> Result {
        if self.failing_tables.contains(table) {
            return Err(Lite2PgError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("access to {table} denied"),
            )));
        }

        Ok(())
    }
}

impl SchemaSource for FakeSource {
    fn database_name(&self) -> &str {
        "fake.db"
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    fn get_columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        self.check_access(table)?;
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    fn get_foreign_keys(&self, table: &str) -> Result<Vec<RawForeignKey>> {
        self.check_access(table)?;
        Ok(self.foreign_keys.get(table).cloned().unwrap_or_default())
    }

    fn get_indexes(&self, table: &str) -> Result<Vec<RawIndex>> {
        self.check_access(table)?;
        Ok(self.indexes.get(table).cloned().unwrap_or_default())
    }

    fn count_rows(&self, table: &str) -> Result<u64> {
        self.check_access(table)?;
        Ok(self.row_counts.get(table).copied().unwrap_or_default())
    }
}

pub fn raw_column(ordinal: i64, name: &str, raw_type: &str) -> RawColumn {
    RawColumn {
        ordinal,
        name: name.to_string(),
        raw_type: raw_type.to_string(),
        not_null: false,
        default_value: None,
        primary_key_position: 0,
    }
}
