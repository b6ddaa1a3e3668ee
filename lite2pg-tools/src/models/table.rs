use crate::ddl_query_builder::DdlQueryBuilder;
use crate::models::{ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor};

#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct TableDescriptor {
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnDescriptor>,
    /// Foreign keys in the order they were discovered.
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    /// Indices in the order they were discovered.
    pub indexes: Vec<IndexDescriptor>,
}

/// How the primary key of a table is declared.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum PrimaryKeyKind<'a> {
    None,
    /// A single column key, declared inline on the column.
    Simple(&'a str),
    /// A multi column key, declared as a trailing table constraint.
    Composite(Vec<&'a str>),
}

impl TableDescriptor {
    pub fn primary_key(&self) -> PrimaryKeyKind<'_> {
        let mut members = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key_member)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();

        match members.len() {
            0 => PrimaryKeyKind::None,
            1 => PrimaryKeyKind::Simple(members.remove(0)),
            _ => PrimaryKeyKind::Composite(members),
        }
    }

    pub fn get_create_statement(&self) -> String {
        let primary_key = self.primary_key();

        let mut query_builder = DdlQueryBuilder::new();
        let mut table_builder = query_builder.create_table_if_not_exists(&self.name);

        for column in &self.columns {
            let data_type = column.target_type().to_string();
            let mut column_builder = table_builder.column(&column.name, &data_type);

            // A simple primary key is implicitly not null; composite members are not.
            let is_simple_primary_key = primary_key == PrimaryKeyKind::Simple(&column.name);
            if is_simple_primary_key {
                column_builder.primary_key();
            }

            if column.not_null && !is_simple_primary_key {
                column_builder.not_null();
            }

            if let Some(default) = column.get_default_expression() {
                column_builder.default(&default);
            }
        }

        if let PrimaryKeyKind::Composite(columns) = &primary_key {
            table_builder.primary_key(columns);
        }

        for foreign_key in &self.foreign_keys {
            let mut fk_builder = table_builder.foreign_key(
                &foreign_key.local_columns,
                &foreign_key.referenced_table,
                &foreign_key.referenced_columns,
            );

            if let Some(action) = foreign_key.on_delete.filter(|a| !a.is_no_op()) {
                fk_builder.on_delete(action.as_sql());
            }

            if let Some(action) = foreign_key.on_update.filter(|a| !a.is_no_op()) {
                fk_builder.on_update(action.as_sql());
            }
        }

        query_builder.build()
    }

    /// Indices that need their own statement, in discovery order.
    pub fn eligible_indexes(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.indexes
            .iter()
            .filter(|i| !i.is_implicit_primary_key_index)
    }

    pub fn get_create_index_statements(&self) -> Vec<String> {
        self.eligible_indexes()
            .map(|i| i.get_create_index_command(&self.name))
            .collect()
    }
}
