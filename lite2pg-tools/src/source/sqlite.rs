use crate::quoting::Quotable;
use crate::source::{IndexOrigin, RawColumn, RawForeignKey, RawIndex, SchemaSource};
use crate::Result;
use rusqlite::{Connection, OpenFlags, Params, Row};
use std::path::Path;
use tracing::instrument;

/// A read only connection to a SQLite database.
///
/// The connection is owned by the source and released when it is dropped, or explicitly
/// through [`SqliteSource::close`] to observe errors from closing.
pub struct SqliteSource {
    connection: Connection,
    database_name: String,
}

impl SqliteSource {
    #[instrument(skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(SqliteSource {
            connection,
            database_name: path.display().to_string(),
        })
    }

    /// Wraps an already open connection, mainly useful for in memory databases.
    pub fn from_connection(connection: Connection, database_name: &str) -> Self {
        SqliteSource {
            connection,
            database_name: database_name.to_string(),
        }
    }

    pub fn close(self) -> Result {
        self.connection.close().map_err(|(_, e)| e)?;

        Ok(())
    }

    fn get_results<T: FromRow, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        let mut statement = self.connection.prepare(sql)?;

        let rows = statement
            .query_map(params, |row| T::from_row(row))?
            .collect::<rusqlite::Result<Vec<T>>>()?;

        Ok(rows)
    }
}

trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl FromRow for RawColumn {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawColumn {
            ordinal: row.get(0)?,
            name: row.get(1)?,
            raw_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            not_null: row.get(3)?,
            default_value: row.get(4)?,
            primary_key_position: row.get(5)?,
        })
    }
}

impl FromRow for RawForeignKey {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawForeignKey {
            id: row.get(0)?,
            seq: row.get(1)?,
            referenced_table: row.get(2)?,
            local_column: row.get(3)?,
            referenced_column: row.get(4)?,
            on_update: row.get(5)?,
            on_delete: row.get(6)?,
        })
    }
}

struct IndexListResult {
    name: String,
    unique: bool,
    origin: Option<String>,
}

impl FromRow for IndexListResult {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(IndexListResult {
            name: row.get(0)?,
            unique: row.get(1)?,
            origin: row.get(2)?,
        })
    }
}

impl FromRow for (Option<String>,) {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok((row.get(0)?,))
    }
}

impl FromRow for (String,) {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok((row.get(0)?,))
    }
}

//language=sqlite
const LIST_TABLES_QUERY: &str = r#"
select name
from sqlite_master
where type = 'table'
  and name not like 'sqlite\_%' escape '\'
order by name;
"#;

//language=sqlite
const COLUMNS_QUERY: &str = r#"
select cid, name, type, "notnull", dflt_value, pk
from pragma_table_info(?1)
order by cid;
"#;

//language=sqlite
const FOREIGN_KEYS_QUERY: &str = r#"
select id, seq, "table", "from", "to", on_update, on_delete
from pragma_foreign_key_list(?1);
"#;

//language=sqlite
const INDEX_LIST_QUERY: &str = r#"
select name, "unique", origin
from pragma_index_list(?1)
order by seq;
"#;

//language=sqlite
const INDEX_COLUMNS_QUERY: &str = r#"
select name
from pragma_index_info(?1)
order by seqno;
"#;

impl SchemaSource for SqliteSource {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    #[instrument(skip_all)]
    fn list_tables(&self) -> Result<Vec<String>> {
        let tables = self
            .get_results::<(String,), _>(LIST_TABLES_QUERY, [])?
            .into_iter()
            .map(|t| t.0)
            .collect();

        Ok(tables)
    }

    #[instrument(skip(self))]
    fn get_columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        self.get_results(COLUMNS_QUERY, [table])
    }

    #[instrument(skip(self))]
    fn get_foreign_keys(&self, table: &str) -> Result<Vec<RawForeignKey>> {
        self.get_results(FOREIGN_KEYS_QUERY, [table])
    }

    #[instrument(skip(self))]
    fn get_indexes(&self, table: &str) -> Result<Vec<RawIndex>> {
        let indexes = self.get_results::<IndexListResult, _>(INDEX_LIST_QUERY, [table])?;

        let mut result = Vec::with_capacity(indexes.len());

        for index in indexes {
            let columns = self
                .get_results::<(Option<String>,), _>(INDEX_COLUMNS_QUERY, [&index.name])?
                .into_iter()
                .map(|c| c.0)
                .collect();

            result.push(RawIndex {
                origin: index.origin.as_deref().and_then(IndexOrigin::from_sqlite),
                name: index.name,
                unique: index.unique,
                columns,
            });
        }

        Ok(result)
    }

    #[instrument(skip(self))]
    fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = format!("select count(*) from {};", table.quote());
        let count: i64 = self.connection.query_row(&sql, [], |row| row.get(0))?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sqlite_source;

    #[test]
    fn lists_user_tables_only() {
        let source = sqlite_source(
            r#"
            create table teams(id integer primary key, name text);
            create table drivers(code varchar(3) primary key) without rowid;
            create table "Odd Name"(value text unique);
            "#,
        );

        assert_eq!(
            source.list_tables().unwrap(),
            vec!["Odd Name".to_string(), "drivers".to_string(), "teams".to_string()]
        );
    }

    #[test]
    fn reads_columns() {
        let source = sqlite_source(
            r#"
            create table drivers(
                id integer primary key,
                code varchar(3) not null,
                status text default 'active',
                notes
            );
            "#,
        );

        let columns = source.get_columns("drivers").unwrap();

        assert_eq!(
            columns,
            vec![
                RawColumn {
                    ordinal: 0,
                    name: "id".to_string(),
                    raw_type: "INTEGER".to_string(),
                    not_null: false,
                    default_value: None,
                    primary_key_position: 1,
                },
                RawColumn {
                    ordinal: 1,
                    name: "code".to_string(),
                    raw_type: "varchar(3)".to_string(),
                    not_null: true,
                    default_value: None,
                    primary_key_position: 0,
                },
                RawColumn {
                    ordinal: 2,
                    name: "status".to_string(),
                    raw_type: "TEXT".to_string(),
                    not_null: false,
                    default_value: Some("'active'".to_string()),
                    primary_key_position: 0,
                },
                RawColumn {
                    ordinal: 3,
                    name: "notes".to_string(),
                    raw_type: "".to_string(),
                    not_null: false,
                    default_value: None,
                    primary_key_position: 0,
                },
            ]
        );
    }

    #[test]
    fn reads_foreign_keys() {
        let source = sqlite_source(
            r#"
            create table teams(id integer primary key);
            create table drivers(
                id integer primary key,
                team_id integer references teams(id) on delete cascade
            );
            "#,
        );

        let foreign_keys = source.get_foreign_keys("drivers").unwrap();

        assert_eq!(
            foreign_keys,
            vec![RawForeignKey {
                id: 0,
                seq: 0,
                referenced_table: "teams".to_string(),
                local_column: "team_id".to_string(),
                referenced_column: Some("id".to_string()),
                on_update: Some("NO ACTION".to_string()),
                on_delete: Some("CASCADE".to_string()),
            }]
        );
    }

    #[test]
    fn reads_indexes_with_origin() {
        let source = sqlite_source(
            r#"
            create table drivers(
                code varchar(3) primary key,
                number integer unique,
                team_id integer
            );
            create index idx_drivers_team on drivers(team_id, number);
            "#,
        );

        let mut indexes = source.get_indexes("drivers").unwrap();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            indexes,
            vec![
                RawIndex {
                    name: "idx_drivers_team".to_string(),
                    unique: false,
                    origin: Some(IndexOrigin::CreateIndex),
                    columns: vec![Some("team_id".to_string()), Some("number".to_string())],
                },
                RawIndex {
                    name: "sqlite_autoindex_drivers_1".to_string(),
                    unique: true,
                    origin: Some(IndexOrigin::PrimaryKey),
                    columns: vec![Some("code".to_string())],
                },
                RawIndex {
                    name: "sqlite_autoindex_drivers_2".to_string(),
                    unique: true,
                    origin: Some(IndexOrigin::UniqueConstraint),
                    columns: vec![Some("number".to_string())],
                },
            ]
        );
    }

    #[test]
    fn counts_rows() {
        let source = sqlite_source(
            r#"
            create table "odd ""name"""(id integer);
            insert into "odd ""name"""(id) values (1), (2), (3);
            "#,
        );

        assert_eq!(source.count_rows("odd \"name\"").unwrap(), 3);
    }

    #[test]
    fn counting_a_missing_table_fails() {
        let source = sqlite_source("create table teams(id integer);");

        assert!(source.count_rows("nope").is_err());
    }

    #[test]
    fn can_be_closed() {
        let source = sqlite_source("create table teams(id integer);");

        source.close().unwrap();
    }
}
