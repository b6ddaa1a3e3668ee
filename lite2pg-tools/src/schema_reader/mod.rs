use crate::models::TableDescriptor;
use crate::source::{RawColumn, RawForeignKey, RawIndex, SchemaSource};
use crate::{Lite2PgError, Result};
use tracing::instrument;

mod foreign_key;
mod index;
mod table_column;

/// Reads table metadata from a source and normalizes it into descriptors.
pub struct SchemaReader<'a, S: SchemaSource> {
    source: &'a S,
}

impl<'a, S: SchemaSource> SchemaReader<'a, S> {
    pub fn new(source: &'a S) -> Self {
        SchemaReader { source }
    }

    #[instrument(skip(self))]
    pub fn read_table(&self, table_name: &str) -> Result<TableDescriptor> {
        let wrap = |e| Lite2PgError::metadata_unavailable(table_name, e);

        let columns = self.source.get_columns(table_name).map_err(wrap)?;
        let foreign_keys = self.source.get_foreign_keys(table_name).map_err(wrap)?;
        let indexes = self.source.get_indexes(table_name).map_err(wrap)?;

        normalize(table_name, columns, foreign_keys, indexes)
    }
}

/// Builds a table descriptor from the raw rows reported by the source.
///
/// Columns are put in ordinal order, foreign key rows are grouped into one key per id and
/// indices backing the primary key are flagged. Fails with
/// [`Lite2PgError::InconsistentMetadata`] when the rows contradict each other.
pub fn normalize(
    table_name: &str,
    raw_columns: Vec<RawColumn>,
    raw_foreign_keys: Vec<RawForeignKey>,
    raw_indexes: Vec<RawIndex>,
) -> Result<TableDescriptor> {
    let inconsistent = |reason: String| Lite2PgError::InconsistentMetadata {
        table: table_name.to_string(),
        reason,
    };

    let columns = table_column::add_columns(raw_columns).map_err(inconsistent)?;
    let foreign_keys = foreign_key::add_foreign_keys(raw_foreign_keys);

    for fk in &foreign_keys {
        for local_column in &fk.local_columns {
            if !columns.iter().any(|c| &c.name == local_column) {
                return Err(inconsistent(format!(
                    "foreign key references unknown local column `{}`",
                    local_column
                )));
            }
        }
    }

    let indexes = index::add_indices(table_name, raw_indexes);

    Ok(TableDescriptor {
        name: table_name.to_string(),
        columns,
        foreign_keys,
        indexes,
    })
}
