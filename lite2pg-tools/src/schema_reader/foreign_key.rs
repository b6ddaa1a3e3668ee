use crate::models::{ForeignKeyDescriptor, ReferentialAction};
use crate::source::RawForeignKey;
use itertools::Itertools;

/// Groups the column pairs of each foreign key, keeping the order the keys were reported in.
pub(super) fn add_foreign_keys(raw_foreign_keys: Vec<RawForeignKey>) -> Vec<ForeignKeyDescriptor> {
    let ids = raw_foreign_keys.iter().map(|fk| fk.id).unique().collect_vec();

    ids.into_iter()
        .map(|id| {
            let rows = raw_foreign_keys
                .iter()
                .filter(|fk| fk.id == id)
                .sorted_by_key(|fk| fk.seq)
                .collect_vec();

            let first = rows[0];

            // A missing referenced column means the key points at the referenced primary key.
            let referenced_columns = if rows.iter().all(|r| r.referenced_column.is_some()) {
                rows.iter()
                    .filter_map(|r| r.referenced_column.clone())
                    .collect()
            } else {
                vec![]
            };

            ForeignKeyDescriptor {
                local_columns: rows.iter().map(|r| r.local_column.clone()).collect(),
                referenced_table: first.referenced_table.clone(),
                referenced_columns,
                on_delete: first.on_delete.as_deref().and_then(ReferentialAction::parse),
                on_update: first.on_update.as_deref().and_then(ReferentialAction::parse),
            }
        })
        .collect()
}
