use crate::Result;

mod sqlite;

pub use sqlite::SqliteSource;

/// A database whose schema can be read.
///
/// Implementations only hand out rows as the source engine reports them. Turning them
/// into descriptors is done by the schema reader.
pub trait SchemaSource {
    /// A human readable name of the database, used in reports and file headers.
    fn database_name(&self) -> &str;

    /// Every user table, excluding the engine's own internal tables, in a deterministic order.
    fn list_tables(&self) -> Result<Vec<String>>;

    fn get_columns(&self, table: &str) -> Result<Vec<RawColumn>>;

    fn get_foreign_keys(&self, table: &str) -> Result<Vec<RawForeignKey>>;

    fn get_indexes(&self, table: &str) -> Result<Vec<RawIndex>>;

    fn count_rows(&self, table: &str) -> Result<u64>;
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct RawColumn {
    pub ordinal: i64,
    pub name: String,
    pub raw_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// Position of the column in the primary key, starting at 1. 0 when the column is not
    /// part of the primary key.
    pub primary_key_position: i64,
}

/// One column pair of a foreign key. Multi column keys are reported as several rows
/// sharing the same `id`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct RawForeignKey {
    pub id: i64,
    pub seq: i64,
    pub referenced_table: String,
    pub local_column: String,
    pub referenced_column: Option<String>,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct RawIndex {
    pub name: String,
    pub unique: bool,
    pub origin: Option<IndexOrigin>,
    /// Member columns in index order. `None` for expression members.
    pub columns: Vec<Option<String>>,
}

/// Why the source created the index.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum IndexOrigin {
    CreateIndex,
    UniqueConstraint,
    PrimaryKey,
}

impl IndexOrigin {
    pub fn from_sqlite(origin: &str) -> Option<Self> {
        match origin {
            "c" => Some(IndexOrigin::CreateIndex),
            "u" => Some(IndexOrigin::UniqueConstraint),
            "pk" => Some(IndexOrigin::PrimaryKey),
            _ => None,
        }
    }
}
