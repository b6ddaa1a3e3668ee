use crate::quoting::{Quotable, QuotableIter};
use itertools::Itertools;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct IndexDescriptor {
    pub name: String,
    pub unique: bool,
    /// Key columns in index order.
    pub columns: Vec<String>,
    /// Set for the indices SQLite creates by itself to back a primary key. Postgres creates
    /// its own index for the primary key constraint, so these are never emitted.
    pub is_implicit_primary_key_index: bool,
}

impl IndexDescriptor {
    pub fn get_create_index_command(&self, table_name: &str) -> String {
        let index_type = if self.unique { "UNIQUE " } else { "" };

        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({});",
            index_type,
            self.name.quote(),
            table_name.quote(),
            self.columns.iter().quote().join(", ")
        )
    }
}
