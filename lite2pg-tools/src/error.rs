use thiserror::Error;

#[derive(Error, Debug)]
pub enum Lite2PgError {
    #[error("Failed to read metadata for table `{table}`: {source}")]
    MetadataUnavailable {
        table: String,
        #[source]
        source: Box<Lite2PgError>,
    },

    #[error("Inconsistent metadata for table `{table}`: {reason}")]
    InconsistentMetadata {
        table: String,
        reason: String,
    },

    #[error("Error from sqlite: `{0}`")]
    SourceUnavailable(#[from] rusqlite::Error),

    #[error("Failed to write the generated ddl: {reason}")]
    OutputSinkFailure {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Error from postgres: `{query}` when executing query: `{source}`")]
    PostgresErrorWithQuery {
        query: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("Error from postgres: `{0}`")]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Invalid response when asking postgres for its version")]
    InvalidPostgresVersionResponse,

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),
}

impl Lite2PgError {
    pub(crate) fn metadata_unavailable(table: &str, source: Lite2PgError) -> Self {
        Lite2PgError::MetadataUnavailable {
            table: table.to_string(),
            source: Box::new(source),
        }
    }

    /// Wraps a sink side error so it is reported as fatal for the run.
    pub fn output_sink_failure(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Lite2PgError::OutputSinkFailure {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for errors that only affect a single table and should not abort the run.
    pub fn is_table_local(&self) -> bool {
        matches!(
            self,
            Lite2PgError::MetadataUnavailable { .. } | Lite2PgError::InconsistentMetadata { .. }
        )
    }
}

pub type Result<T = ()> = std::result::Result<T, Lite2PgError>;
