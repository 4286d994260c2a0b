//! Tracing utilities for compilation and query observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// nestql_trace_sql!(&sql, params.len());
/// ```
#[macro_export]
macro_rules! nestql_trace_sql {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "nestql.query");
    };
}

/// Emit a trace-level event for one compiled nesting level.
///
/// ```ignore
/// nestql_trace_compile!(entity, alias, multiple);
/// ```
#[macro_export]
macro_rules! nestql_trace_compile {
    ($entity:expr, $alias:expr, $multiple:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(entity = %$entity, alias = %$alias, multiple = $multiple, "nestql.compile");
    };
}

/// Emit a debug-level event with the number of rows and entities materialized.
#[macro_export]
macro_rules! nestql_trace_rows {
    ($entity:expr, $rows:expr, $entities:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(entity = %$entity, rows = $rows, entities = $entities, "nestql.materialize");
    };
}
