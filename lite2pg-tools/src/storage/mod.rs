use crate::pipeline::DdlDocument;
use crate::report::SchemaReport;
use crate::Result;

mod postgres_target;
mod sql_file;

pub use postgres_target::PostgresTarget;
pub use sql_file::SqlFile;

/// Somewhere the generated DDL can be written to.
pub trait DdlSink: Send {
    /// Writes every statement of the document, in document order.
    ///
    /// Errors are reported as [`crate::Lite2PgError::OutputSinkFailure`] and are fatal for the run.
    fn apply_document(
        &mut self,
        document: &DdlDocument,
        report: &SchemaReport,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
