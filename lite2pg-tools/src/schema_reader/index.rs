use crate::models::IndexDescriptor;
use crate::source::{IndexOrigin, RawIndex};
use tracing::warn;

/// The prefix SQLite uses for the indices it creates by itself.
pub const SQLITE_AUTO_INDEX_PREFIX: &str = "sqlite_autoindex_";

impl RawIndex {
    /// An auto index backs the primary key, unless the source says it backs a unique constraint.
    pub fn is_implicit_primary_key_index(&self) -> bool {
        self.name.starts_with(SQLITE_AUTO_INDEX_PREFIX)
            && self.origin != Some(IndexOrigin::UniqueConstraint)
    }
}

pub(super) fn add_indices(table_name: &str, raw_indexes: Vec<RawIndex>) -> Vec<IndexDescriptor> {
    let mut indices = Vec::with_capacity(raw_indexes.len());

    for raw in raw_indexes {
        let is_implicit_primary_key_index = raw.is_implicit_primary_key_index();

        let Some(columns) = raw.columns.iter().cloned().collect::<Option<Vec<String>>>() else {
            warn!(table = table_name, index = %raw.name, "Skipping index on expressions, only plain columns can be translated");
            continue;
        };

        indices.push(IndexDescriptor {
            name: raw.name,
            unique: raw.unique,
            columns,
            is_implicit_primary_key_index,
        });
    }

    indices
}
