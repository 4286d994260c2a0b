//! Asynchronous execution through [`tokio_postgres`].
//!
//! ```no_run
//! use nestql_postgres::tokio::TokioPostgresExecutor;
//!
//! # fn run(client: ::tokio_postgres::Client) {
//! // `client` comes from `tokio_postgres::connect`, with its connection task spawned.
//! let executor = TokioPostgresExecutor::new(client);
//! # }
//! ```

use nestql_core::error::Result;
use nestql_core::executor::{Executor, Row};
use nestql_core::nestql_trace_sql;
use serde_json::Value;
use tokio_postgres::Client;
use tokio_postgres::types::ToSql;

/// Executes compiled statements on a [`Client`]. The `data` column is read
/// as `json` and handed on as text.
pub struct TokioPostgresExecutor {
    client: Client,
}

impl TokioPostgresExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn into_inner(self) -> Client {
        self.client
    }
}

impl Executor for TokioPostgresExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        nestql_trace_sql!(sql, params.len());

        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let rows = self.client.query(sql, &params).await?;

        rows.iter()
            .map(|row| -> Result<Row> {
                let data: Option<Value> = row.try_get(0)?;
                Ok(Row::from(data.map(|value| value.to_string())))
            })
            .collect()
    }
}
