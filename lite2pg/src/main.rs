use crate::cli::{CheckArgs, Cli, Commands, TargetDbArgs};
use clap::Parser;
use lite2pg_tools::{
    generate_schema, DdlSink, Lite2PgError, PipelineOptions, PostgresTarget, Result, SchemaRun,
    SchemaSource, SqlFile, SqliteSource,
};
use std::process::ExitCode;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
enum Outcome {
    Complete,
    /// Some tables were skipped. Everything else was still written.
    Partial,
}

impl Outcome {
    fn of(run: &SchemaRun) -> Self {
        if run.is_partial() {
            Outcome::Partial
        } else {
            Outcome::Complete
        }
    }

    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Complete => ExitCode::SUCCESS,
            Outcome::Partial => ExitCode::from(2),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(skip_all)]
async fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Commands::Analyze { json } => do_analyze(&cli.sqlite_db_path, json).await,
        Commands::Export {
            path,
            no_row_counts,
        } => do_export(&cli.sqlite_db_path, &path, !no_row_counts).await,
        Commands::Apply { target } => do_apply(&cli.sqlite_db_path, target).await,
        Commands::Check(args) => do_check(&cli.sqlite_db_path, args).await,
    }
}

fn read_schema(sqlite_db_path: &str, count_rows: bool) -> Result<SchemaRun> {
    let source = SqliteSource::open(sqlite_db_path)?;

    let run = generate_schema(&source, &PipelineOptions { count_rows })?;

    source.close()?;

    if run.is_partial() {
        warn!(
            skipped = run.report.failures.len(),
            total = run.report.total_tables,
            "Some tables could not be translated"
        );
    }

    Ok(run)
}

#[instrument(skip_all)]
async fn do_analyze(sqlite_db_path: &str, json: Option<String>) -> Result<Outcome> {
    let run = read_schema(sqlite_db_path, true)?;

    info!(
        database = %run.report.database,
        tables = run.report.tables.len(),
        columns = run.report.tables.iter().map(|t| t.column_count).sum::<usize>(),
        foreign_keys = run.report.tables.iter().map(|t| t.foreign_key_count).sum::<usize>(),
        indexes = run.report.tables.iter().map(|t| t.index_count).sum::<usize>(),
        "Analysis complete"
    );

    if let Some(path) = json {
        let content = serde_json::to_string_pretty(&run.report)
            .map_err(|e| Lite2PgError::output_sink_failure("Failed to serialize the report", e))?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| Lite2PgError::output_sink_failure(format!("Failed to write `{path}`"), e))?;

        info!(%path, "Wrote report");
    }

    Ok(Outcome::of(&run))
}

#[instrument(skip_all)]
async fn do_export(sqlite_db_path: &str, path: &str, count_rows: bool) -> Result<Outcome> {
    let run = read_schema(sqlite_db_path, count_rows)?;

    let mut sql_file = SqlFile::new_file(path).await?;
    sql_file.apply_document(&run.document, &run.report).await?;

    info!(%path, statements = run.document.blocks().len(), "Wrote ddl script");

    Ok(Outcome::of(&run))
}

#[instrument(skip_all)]
async fn do_apply(sqlite_db_path: &str, target: TargetDbArgs) -> Result<Outcome> {
    let run = read_schema(sqlite_db_path, false)?;

    let mut postgres = PostgresTarget::connect(&target.get_connection_string()).await?;
    postgres.apply_document(&run.document, &run.report).await?;

    Ok(Outcome::of(&run))
}

#[instrument(skip_all)]
async fn do_check(sqlite_db_path: &str, args: CheckArgs) -> Result<Outcome> {
    let source = SqliteSource::open(sqlite_db_path)?;
    let tables = source.list_tables()?;

    info!(database = source.database_name(), tables = tables.len(), "Connected to SQLite");

    for table in &tables {
        match source.count_rows(table) {
            Ok(rows) => info!(%table, rows, "Found table"),
            Err(e) => warn!(%table, reason = %e, "Failed to count rows"),
        }
    }

    source.close()?;

    if let Some(target) = args.target() {
        let postgres = PostgresTarget::connect(&target.get_connection_string()).await?;
        let version = postgres.server_version().await?;

        info!(host = %target.target_db_host, %version, "Connected to PostgreSQL");
    }

    Ok(Outcome::Complete)
}
