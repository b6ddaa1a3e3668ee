use crate::report::{SchemaReport, TableFailure, TableSummary};
use crate::schema_reader::SchemaReader;
use crate::source::SchemaSource;
use crate::Result;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Count the rows of every table for the report.
    pub count_rows: bool,
}

/// One statement of the generated script.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DdlBlock {
    CreateTable { table: String, sql: String },
    CreateIndex { table: String, name: String, sql: String },
}

impl DdlBlock {
    pub fn sql(&self) -> &str {
        match self {
            DdlBlock::CreateTable { sql, .. } | DdlBlock::CreateIndex { sql, .. } => sql,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            DdlBlock::CreateTable { table, .. } | DdlBlock::CreateIndex { table, .. } => table,
        }
    }
}

/// The generated script. Every `CREATE TABLE` comes before the first `CREATE INDEX`.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct DdlDocument {
    blocks: Vec<DdlBlock>,
}

impl DdlDocument {
    fn new(tables: Vec<DdlBlock>, indices: Vec<DdlBlock>) -> Self {
        let mut blocks = tables;
        blocks.extend(indices);

        DdlDocument { blocks }
    }

    pub fn blocks(&self) -> &[DdlBlock] {
        &self.blocks
    }

    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.sql())
    }

    pub fn table_blocks(&self) -> impl Iterator<Item = &DdlBlock> {
        self.blocks
            .iter()
            .filter(|b| matches!(b, DdlBlock::CreateTable { .. }))
    }

    pub fn index_blocks(&self) -> impl Iterator<Item = &DdlBlock> {
        self.blocks
            .iter()
            .filter(|b| matches!(b, DdlBlock::CreateIndex { .. }))
    }

    /// All statements, one per line.
    pub fn to_sql_string(&self) -> String {
        let mut sql = String::new();
        for statement in self.statements() {
            sql.push_str(statement);
            sql.push('\n');
        }
        sql
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub struct SchemaRun {
    pub document: DdlDocument,
    pub report: SchemaReport,
}

impl SchemaRun {
    /// True if at least one table could not be translated.
    pub fn is_partial(&self) -> bool {
        self.report.has_failures()
    }
}

/// Translates every table of the source.
///
/// A table whose metadata cannot be read is logged, recorded in the report and skipped,
/// so the document still contains every other table. Failing to list the tables at all
/// is fatal.
#[instrument(skip_all)]
pub fn generate_schema<S: SchemaSource>(source: &S, options: &PipelineOptions) -> Result<SchemaRun> {
    let mut table_names = source.list_tables()?;
    table_names.sort();

    let reader = SchemaReader::new(source);
    let mut report = SchemaReport::new(source.database_name(), table_names.len());
    let mut table_blocks = Vec::with_capacity(table_names.len());
    let mut index_blocks = Vec::new();

    for table_name in &table_names {
        let table = match reader.read_table(table_name) {
            Ok(table) => table,
            Err(e) if e.is_table_local() => {
                warn!(table = %table_name, reason = %e, "Skipping table");
                report.failures.push(TableFailure {
                    table_name: table_name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        table_blocks.push(DdlBlock::CreateTable {
            table: table.name.clone(),
            sql: table.get_create_statement(),
        });

        for index in table.eligible_indexes() {
            index_blocks.push(DdlBlock::CreateIndex {
                table: table.name.clone(),
                name: index.name.clone(),
                sql: index.get_create_index_command(&table.name),
            });
        }

        let row_count = if options.count_rows {
            match source.count_rows(table_name) {
                Ok(count) => Some(count),
                Err(e) => {
                    warn!(table = %table_name, reason = %e, "Failed to count rows");
                    None
                }
            }
        } else {
            None
        };

        let summary = TableSummary::from_table(&table, row_count);
        info!(
            table = %summary.table_name,
            columns = summary.column_count,
            foreign_keys = summary.foreign_key_count,
            indexes = summary.index_count,
            rows = ?summary.row_count,
            "Translated table"
        );
        report.tables.push(summary);
    }

    Ok(SchemaRun {
        document: DdlDocument::new(table_blocks, index_blocks),
        report,
    })
}
