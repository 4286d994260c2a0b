//! The execution channel: anything that can run one SQL statement and hand
//! back rows with a JSON `data` column.

use std::future::Future;

use serde_json::Value;

use crate::error::Result;

/// One result row of a compiled statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// JSON text of the `data` column; `None` when the backend returned NULL.
    pub data: Option<String>,
}

impl Row {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }

    pub fn null() -> Self {
        Self { data: None }
    }
}

impl From<Option<String>> for Row {
    fn from(data: Option<String>) -> Self {
        Self { data }
    }
}

/// Runs SQL against a backend.
///
/// Driver failures are returned unchanged; retries and timeouts are the
/// implementor's business.
pub trait Executor {
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<Vec<Row>>>;
}

impl<E: Executor> Executor for &E {
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<Vec<Row>>> {
        (**self).execute(sql, params)
    }
}
