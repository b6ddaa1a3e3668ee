use crate::quoting::{quote_identifier_if_needed, Quotable, QuotableIter};
use itertools::Itertools;

pub struct DdlQueryBuilder {
    sql: String,
}

impl DdlQueryBuilder {
    pub fn new() -> Self {
        Self { sql: String::new() }
    }

    /// Starts a `create table if not exists` statement. The table name is only quoted when
    /// it is not a plain lowercase identifier.
    pub fn create_table_if_not_exists(&mut self, table: &str) -> DdlTableBuilder<'_> {
        self.sql.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (",
            quote_identifier_if_needed(table)
        ));

        DdlTableBuilder {
            query_builder: self,
            has_first_line: false,
        }
    }

    pub fn build(mut self) -> String {
        self.sql.push_str(");");

        self.sql
    }
}

impl Default for DdlQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DdlTableBuilder<'b> {
    query_builder: &'b mut DdlQueryBuilder,
    has_first_line: bool,
}

impl DdlTableBuilder<'_> {
    pub fn column<'b>(&'b mut self, name: &str, data_type: &str) -> DdlTableColumnBuilder<'b> {
        self.start_new_line();
        self.query_builder
            .sql
            .push_str(&format!("{} {}", name.quote(), data_type));

        DdlTableColumnBuilder {
            sql: &mut self.query_builder.sql,
        }
    }

    pub fn primary_key<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.start_new_line();
        let cols = columns.into_iter().quote().join(", ");
        self.query_builder
            .sql
            .push_str(&format!("PRIMARY KEY ({})", cols));

        self
    }

    pub fn foreign_key<'b, S: AsRef<str>>(
        &'b mut self,
        columns: impl IntoIterator<Item = S>,
        referenced_table: &str,
        referenced_columns: impl IntoIterator<Item = S>,
    ) -> DdlForeignKeyBuilder<'b> {
        self.start_new_line();
        let cols = columns.into_iter().quote().join(", ");
        let referenced_cols = referenced_columns.into_iter().quote().join(", ");

        let sql = &mut self.query_builder.sql;
        sql.push_str(&format!("FOREIGN KEY ({}) REFERENCES {}", cols, referenced_table.quote()));
        if !referenced_cols.is_empty() {
            sql.push_str(&format!("({})", referenced_cols));
        }

        DdlForeignKeyBuilder { sql }
    }

    fn start_new_line(&mut self) {
        if self.has_first_line {
            self.query_builder.sql.push_str(", ")
        } else {
            self.has_first_line = true;
        }
    }
}

pub struct DdlTableColumnBuilder<'a> {
    sql: &'a mut String,
}

impl DdlTableColumnBuilder<'_> {
    pub fn primary_key(&mut self) -> &mut Self {
        self.sql.push_str(" PRIMARY KEY");

        self
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.sql.push_str(" NOT NULL");

        self
    }

    pub fn default(&mut self, expression: &str) -> &mut Self {
        self.sql.push_str(" DEFAULT ");
        self.sql.push_str(expression);

        self
    }
}

pub struct DdlForeignKeyBuilder<'a> {
    sql: &'a mut String,
}

impl DdlForeignKeyBuilder<'_> {
    pub fn on_delete(&mut self, action: &str) -> &mut Self {
        self.sql.push_str(" ON DELETE ");
        self.sql.push_str(action);

        self
    }

    pub fn on_update(&mut self, action: &str) -> &mut Self {
        self.sql.push_str(" ON UPDATE ");
        self.sql.push_str(action);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_create_table_expression() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("my_table");
        table_builder.column("id", "INTEGER").primary_key();
        table_builder.column("name", "VARCHAR(255)");
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS my_table ("id" INTEGER PRIMARY KEY, "name" VARCHAR(255));"#
        );
    }

    #[test]
    fn quotes_table_names_that_need_it() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("Race Results");
        table_builder.column("position", "INTEGER");
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS "Race Results" ("position" INTEGER);"#
        );
    }

    #[test]
    fn multiple_primary_keys() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("my_table");
        table_builder.column("id", "INTEGER").not_null();
        table_builder.column("name", "VARCHAR(255)").not_null();
        table_builder.primary_key(vec!["id", "name"]);
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS my_table ("id" INTEGER NOT NULL, "name" VARCHAR(255) NOT NULL, PRIMARY KEY ("id", "name"));"#
        );
    }

    #[test]
    fn columns_only() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("my_table");
        table_builder.column("id", "INTEGER");
        table_builder.column("status", "TEXT").default("'active'");
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS my_table ("id" INTEGER, "status" TEXT DEFAULT 'active');"#
        );
    }

    #[test]
    fn foreign_keys_with_actions() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("child");
        table_builder.column("parent_id", "INTEGER");
        table_builder
            .foreign_key(["parent_id"], "parent", ["id"])
            .on_delete("CASCADE")
            .on_update("SET NULL");
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS child ("parent_id" INTEGER, FOREIGN KEY ("parent_id") REFERENCES "parent"("id") ON DELETE CASCADE ON UPDATE SET NULL);"#
        );
    }

    #[test]
    fn foreign_key_without_referenced_columns() {
        let mut builder = DdlQueryBuilder::new();
        let mut table_builder = builder.create_table_if_not_exists("child");
        table_builder.column("parent_id", "INTEGER");
        table_builder.foreign_key(["parent_id"], "parent", Vec::<&str>::new());
        let result = builder.build();

        assert_eq!(
            result,
            r#"CREATE TABLE IF NOT EXISTS child ("parent_id" INTEGER, FOREIGN KEY ("parent_id") REFERENCES "parent");"#
        );
    }
}
