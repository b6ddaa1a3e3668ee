use crate::pipeline::DdlDocument;
use crate::report::SchemaReport;
use crate::storage::DdlSink;
use crate::{Lite2PgError, Result};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::{debug, info, instrument};

/// Executes the generated DDL directly against a PostgreSQL database.
pub struct PostgresTarget {
    client: Client,
    join_handle: JoinHandle<Result<()>>,
}

impl PostgresTarget {
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| Lite2PgError::output_sink_failure("Failed to connect to postgres", e))?;

        // The connection object performs the actual communication with the database,
        // so spawn it off to run on its own.
        let join_handle = tokio::spawn(async move {
            match connection.await {
                Err(e) => Err(Lite2PgError::PostgresError(e)),
                Ok(_) => Ok(()),
            }
        });

        Ok(PostgresTarget { client, join_handle })
    }

    /// The version string the server reports, for example `16.2`.
    pub async fn server_version(&self) -> Result<String> {
        let messages = self.client.simple_query("SHOW server_version;").await?;

        messages
            .iter()
            .find_map(|m| match m {
                SimpleQueryMessage::Row(row) => row.get(0).map(str::to_string),
                _ => None,
            })
            .ok_or(Lite2PgError::InvalidPostgresVersionResponse)
    }
}

impl DdlSink for PostgresTarget {
    /// All statements run in a single transaction, so a failure leaves the target untouched.
    #[instrument(skip_all)]
    async fn apply_document(&mut self, document: &DdlDocument, _report: &SchemaReport) -> Result<()> {
        let transaction = self
            .client
            .transaction()
            .await
            .map_err(|e| Lite2PgError::output_sink_failure("Failed to start transaction", e))?;

        for statement in document.statements() {
            debug!(statement, "Executing");
            transaction.batch_execute(statement).await.map_err(|e| {
                Lite2PgError::output_sink_failure(
                    format!("Failed to execute `{statement}`"),
                    Lite2PgError::PostgresErrorWithQuery {
                        query: statement.to_string(),
                        source: e,
                    },
                )
            })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| Lite2PgError::output_sink_failure("Failed to commit transaction", e))?;

        info!(statements = document.blocks().len(), "Applied ddl to postgres");

        Ok(())
    }
}

impl Drop for PostgresTarget {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}
