//! In-process execution through [`rusqlite`](::rusqlite).
//!
//! ```no_run
//! use nestql_sqlite::rusqlite::RusqliteExecutor;
//!
//! # fn main() -> nestql_core::Result<()> {
//! let conn = ::rusqlite::Connection::open_in_memory()?;
//! let executor = RusqliteExecutor::new(conn)?;
//! # Ok(())
//! # }
//! ```

use std::future::{Future, ready};
use std::sync::Arc;

use ::rusqlite::functions::FunctionFlags;
use ::rusqlite::types::{Value as SqlValue, ValueRef};
use ::rusqlite::{Connection, params_from_iter};
use nestql_core::error::Result;
use nestql_core::executor::{Executor, Row};
use nestql_core::nestql_trace_sql;
use regex::Regex;
use serde_json::Value;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes compiled statements on a rusqlite [`Connection`].
#[derive(Debug)]
pub struct RusqliteExecutor {
    conn: Connection,
}

impl RusqliteExecutor {
    /// Wraps `conn`, registering the `regexp(pattern, text)` function.
    pub fn new(conn: Connection) -> Result<Self> {
        register_regexp(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    /// Runs `sql` and collects the `data` column of every row.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        nestql_trace_sql!(sql, params.len());

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter().map(to_sql_value)), |row| {
            row.get::<_, Option<String>>(0)
        })?;
        Ok(rows
            .map(|data| data.map(Row::from))
            .collect::<::rusqlite::Result<Vec<_>>>()?)
    }
}

impl Executor for RusqliteExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<Vec<Row>>> {
        ready(self.query(sql, params))
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// `regexp(pattern, text)`: true when `text` matches. NULL text never matches.
/// The compiled pattern is cached per statement.
fn register_regexp(conn: &Connection) -> ::rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> std::result::Result<_, BoxError> {
                Ok(Regex::new(pattern.as_str()?)?)
            })?;
            let is_match = match ctx.get_raw(1) {
                ValueRef::Null => false,
                text => regex.is_match(
                    text.as_str()
                        .map_err(|e| ::rusqlite::Error::UserFunctionError(e.into()))?,
                ),
            };
            Ok(is_match)
        },
    )
}
