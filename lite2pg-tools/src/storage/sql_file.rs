use crate::pipeline::DdlDocument;
use crate::report::SchemaReport;
use crate::storage::DdlSink;
use crate::{Lite2PgError, Result};
use itertools::Itertools;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::instrument;

static BANNER: &str = "-- ============================================================";

/// Writes the generated DDL as a script that can be fed to `psql`.
pub struct SqlFile<F: AsyncWrite + Unpin + Send + Sync> {
    file: F,
}

impl SqlFile<BufWriter<File>> {
    pub async fn new_file(path: &str) -> Result<Self> {
        let file = File::create(path)
            .await
            .map_err(|e| Lite2PgError::output_sink_failure(format!("Failed to create `{path}`"), e))?;

        Ok(SqlFile::new(BufWriter::new(file)))
    }
}

impl<F: AsyncWrite + Unpin + Send + Sync> SqlFile<F> {
    /// Create a new `SqlFile` from a file-like object. This does not do any additional buffering
    /// so it's recommended to use a `BufWriter` or similar.
    pub fn new(file: F) -> Self {
        SqlFile { file }
    }

    async fn write_document(&mut self, document: &DdlDocument, report: &SchemaReport) -> std::io::Result<()> {
        let file = &mut self.file;

        file.write_all(b"-- PostgreSQL Schema\n").await?;
        file.write_all(format!("-- Generated from SQLite database at {}\n", report.database).as_bytes())
            .await?;
        file.write_all(format!("-- Total Tables: {}\n", report.total_tables).as_bytes())
            .await?;
        if report.has_failures() {
            let skipped = report.failures.iter().map(|f| f.table_name.as_str()).join(", ");
            file.write_all(format!("-- Skipped Tables: {skipped}\n").as_bytes())
                .await?;
        }
        file.write_all(b"\n").await?;

        file.write_all(b"-- DROP SCHEMA public CASCADE;\n").await?;
        file.write_all(b"-- CREATE SCHEMA IF NOT EXISTS public;\n\n").await?;

        write_banner(file, "TABLE DEFINITIONS").await?;

        for block in document.table_blocks() {
            file.write_all(format!("-- Table: {}\n", block.table()).as_bytes())
                .await?;
            file.write_all(block.sql().as_bytes()).await?;
            file.write_all(b"\n").await?;
        }

        write_banner(file, "INDEX DEFINITIONS").await?;

        let index_groups = document
            .index_blocks()
            .chunk_by(|b| b.table().to_string())
            .into_iter()
            .map(|(table, blocks)| (table, blocks.collect_vec()))
            .collect_vec();

        for (table, blocks) in index_groups {
            file.write_all(format!("-- Indexes for table: {table}\n").as_bytes())
                .await?;
            for block in blocks {
                file.write_all(block.sql().as_bytes()).await?;
                file.write_all(b"\n").await?;
            }
            file.write_all(b"\n").await?;
        }

        file.flush().await?;

        Ok(())
    }
}

async fn write_banner<F: AsyncWrite + Unpin>(file: &mut F, title: &str) -> std::io::Result<()> {
    file.write_all(b"\n").await?;
    file.write_all(BANNER.as_bytes()).await?;
    file.write_all(format!("\n-- {title}\n").as_bytes()).await?;
    file.write_all(BANNER.as_bytes()).await?;
    file.write_all(b"\n").await?;
    Ok(())
}

impl<F: AsyncWrite + Unpin + Send + Sync> DdlSink for SqlFile<F> {
    #[instrument(skip_all)]
    async fn apply_document(&mut self, document: &DdlDocument, report: &SchemaReport) -> Result<()> {
        self.write_document(document, report)
            .await
            .map_err(|e| Lite2PgError::output_sink_failure("Failed to write sql file", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{generate_schema, PipelineOptions};
    use crate::test_helpers::{raw_column, sqlite_source, FakeSource};
    use indoc::indoc;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::test;

    async fn export_to_string<S: crate::source::SchemaSource>(source: &S) -> String {
        let run = generate_schema(source, &PipelineOptions::default()).unwrap();

        let mut result_file = Vec::<u8>::new();
        {
            let mut sql_file = SqlFile::new(&mut result_file);
            sql_file.apply_document(&run.document, &run.report).await.unwrap();
        }

        String::from_utf8(result_file).unwrap()
    }

    #[test]
    async fn exports_to_fake_file() {
        let source = sqlite_source(
            r#"
            create table teams(id integer primary key, name varchar(50) not null);
            create table drivers(
                id integer primary key,
                code varchar(3) not null,
                team_id integer,
                foreign key (team_id) references teams(id) on delete cascade
            );
            create index idx_drivers_team on drivers(team_id);
            create index idx_drivers_code on drivers(code);
            create unique index idx_teams_name on teams(name);
            "#,
        );

        let result_file = export_to_string(&source).await;

        similar_asserts::assert_eq!(
            result_file,
            indoc! {r#"
            -- PostgreSQL Schema
            -- Generated from SQLite database at :memory:
            -- Total Tables: 2

            -- DROP SCHEMA public CASCADE;
            -- CREATE SCHEMA IF NOT EXISTS public;


            -- ============================================================
            -- TABLE DEFINITIONS
            -- ============================================================
            -- Table: drivers
            CREATE TABLE IF NOT EXISTS drivers ("id" INTEGER PRIMARY KEY, "code" VARCHAR(3) NOT NULL, "team_id" INTEGER, FOREIGN KEY ("team_id") REFERENCES "teams"("id") ON DELETE CASCADE);
            -- Table: teams
            CREATE TABLE IF NOT EXISTS teams ("id" INTEGER PRIMARY KEY, "name" VARCHAR(50) NOT NULL);

            -- ============================================================
            -- INDEX DEFINITIONS
            -- ============================================================
            -- Indexes for table: drivers
            CREATE INDEX IF NOT EXISTS "idx_drivers_code" ON "drivers" ("code");
            CREATE INDEX IF NOT EXISTS "idx_drivers_team" ON "drivers" ("team_id");

            -- Indexes for table: teams
            CREATE UNIQUE INDEX IF NOT EXISTS "idx_teams_name" ON "teams" ("name");

            "#}
        );
    }

    #[test]
    async fn lists_skipped_tables_in_the_header() {
        let source = FakeSource::default()
            .with_table("circuits", vec![raw_column(0, "id", "INTEGER")])
            .with_table("drivers", vec![raw_column(0, "id", "INTEGER")])
            .failing("drivers");

        let result_file = export_to_string(&source).await;

        similar_asserts::assert_eq!(
            result_file,
            indoc! {r#"
            -- PostgreSQL Schema
            -- Generated from SQLite database at fake.db
            -- Total Tables: 2
            -- Skipped Tables: drivers

            -- DROP SCHEMA public CASCADE;
            -- CREATE SCHEMA IF NOT EXISTS public;


            -- ============================================================
            -- TABLE DEFINITIONS
            -- ============================================================
            -- Table: circuits
            CREATE TABLE IF NOT EXISTS circuits ("id" INTEGER);

            -- ============================================================
            -- INDEX DEFINITIONS
            -- ============================================================
            "#}
        );
    }

    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    async fn write_errors_are_sink_failures() {
        let source = FakeSource::default().with_table("circuits", vec![raw_column(0, "id", "INTEGER")]);
        let run = generate_schema(&source, &PipelineOptions::default()).unwrap();

        let mut sql_file = SqlFile::new(BrokenPipe);
        let result = sql_file.apply_document(&run.document, &run.report).await;

        assert!(matches!(result, Err(Lite2PgError::OutputSinkFailure { .. })));
    }
}
