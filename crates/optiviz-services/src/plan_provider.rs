//! Execution-plan providers for connected mode

use async_trait::async_trait;
use optiviz_analyzer::{PlanError, normalize_plan};
use optiviz_core::TreeValue;
use tokio_postgres::NoTls;

/// Obtains an EXPLAIN plan for a query by running it against a live database
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Returns the normalized plan object (the first element of the EXPLAIN array)
    async fn explain(&self, connection_string: &str, query: &str) -> Result<TreeValue, PlanError>;
}

/// Which EXPLAIN options are requested on top of `FORMAT JSON, COSTS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainOptions {
    /// Execute the query to collect actual row counts and timings
    pub analyze: bool,
    /// Report buffer usage
    pub buffers: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            analyze: true,
            buffers: true,
        }
    }
}

impl ExplainOptions {
    pub fn with_analyze(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }

    pub fn with_buffers(mut self, buffers: bool) -> Self {
        self.buffers = buffers;
        self
    }

    /// Builds the EXPLAIN statement for `query`. A trailing semicolon is dropped
    /// so the statement stays a single command.
    pub fn explain_statement(&self, query: &str) -> String {
        let mut options = vec!["FORMAT JSON", "COSTS"];
        if self.analyze {
            options.push("ANALYZE");
        }
        if self.buffers {
            options.push("BUFFERS");
        }

        let query = query.trim().trim_end_matches(';').trim_end();
        format!("EXPLAIN ({}) {}", options.join(", "), query)
    }
}

/// Runs EXPLAIN over a fresh `tokio-postgres` connection per request
#[derive(Debug, Clone, Default)]
pub struct PostgresPlanProvider {
    options: ExplainOptions,
}

impl PostgresPlanProvider {
    pub fn new(options: ExplainOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExplainOptions {
        self.options
    }
}

#[async_trait]
impl PlanProvider for PostgresPlanProvider {
    #[tracing::instrument(skip(self, connection_string, query), fields(analyze = self.options.analyze))]
    async fn explain(&self, connection_string: &str, query: &str) -> Result<TreeValue, PlanError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| PlanError::Connection(format!("Failed to connect to PostgreSQL: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        let statement = self.options.explain_statement(query);
        tracing::debug!(statement = %statement, "running EXPLAIN");

        let rows = client
            .query(statement.as_str(), &[])
            .await
            .map_err(|e| PlanError::Query(e.to_string()))?;

        let row = rows.first().ok_or(PlanError::EmptyResult)?;
        let payload: TreeValue = row
            .try_get(0)
            .map_err(|e| PlanError::Query(format!("Failed to read EXPLAIN output: {}", e)))?;

        normalize_plan(payload)
    }
}
