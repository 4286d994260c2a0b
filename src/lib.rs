//! # nestql
//!
//! Compiles a nested relational filter into one SQL statement that returns the
//! whole include graph as JSON, then materializes the rows into entities.
//!
//! ## Quick Start
//!
//! ```rust
//! use nestql::prelude::*;
//! use nestql::sqlite::SQLiteDialect;
//!
//! let schema = Schema::new()
//!     .entity(
//!         "Customer",
//!         EntityDef::new("customers")
//!             .field("id")
//!             .field("name")
//!             .relation("orders", RelationMeta::has_many("Order", "customerId")),
//!     )
//!     .entity(
//!         "Order",
//!         EntityDef::new("orders")
//!             .field("id")
//!             .typed_field("customerId", "customer_id", FieldType::Scalar),
//!     );
//!
//! let filter: Filter = r#"{"where": {"name": {"like": "Jo%"}}, "include": "orders"}"#
//!     .parse()
//!     .unwrap();
//! let statement = compile(&schema, &SQLiteDialect, "Customer", &filter, &CompileOptions::default())
//!     .unwrap();
//! assert!(statement.sql().starts_with("SELECT json_object('id', _0.\"id\""));
//! ```
//!
//! ## Database Support
//!
//! | Database   | Adapter           | Execution channel                  | Feature Flag     |
//! |------------|-------------------|------------------------------------|------------------|
//! | SQLite     | `SQLiteDialect`   | `rusqlite::RusqliteExecutor`       | `rusqlite`       |
//! | PostgreSQL | `PostgresDialect` | `tokio::TokioPostgresExecutor`     | `tokio-postgres` |
//! | MySQL      | `MySqlDialect`    | bring your own [`Executor`]        | `mysql`          |

mod nestql;

pub use nestql::Nestql;

/// Result type for nestql operations
pub use nestql_core::error::Result;

/// Database dialect enum
pub use nestql_types::Dialect;

pub use nestql_core::{
    CompileOptions, CompiledStatement, DialectAdapter, Entity, Executor, Filter, QueryCompiler,
    Related, Row, Schema, SchemaProvider, compile, materialize,
};

/// Error types
pub mod error {
    pub use nestql_core::error::NestqlError;
}

/// Compiler building blocks, for custom adapters and schema providers.
pub mod core {
    pub use nestql_core::*;
}

#[cfg(feature = "sqlite")]
pub use nestql_sqlite as sqlite;

#[cfg(feature = "postgres")]
pub use nestql_postgres as postgres;

#[cfg(feature = "mysql")]
pub use nestql_mysql as mysql;

/// Adapter for `dialect`, chosen once when a [`Nestql`] is constructed.
///
/// Fails with [`NestqlError::UnsupportedBackend`](error::NestqlError::UnsupportedBackend)
/// when the dialect's crate feature is disabled.
pub fn adapter_for(dialect: Dialect) -> Result<Box<dyn DialectAdapter>> {
    match dialect {
        #[cfg(feature = "sqlite")]
        Dialect::SQLite => Ok(Box::new(nestql_sqlite::SQLiteDialect)),
        #[cfg(feature = "postgres")]
        Dialect::PostgreSQL => Ok(Box::new(nestql_postgres::PostgresDialect)),
        #[cfg(feature = "mysql")]
        Dialect::MySQL => Ok(Box::new(nestql_mysql::MySqlDialect)),
        #[allow(unreachable_patterns)]
        other => Err(error::NestqlError::UnsupportedBackend {
            dialect: other.as_str(),
            feature: "its dialect adapter (crate feature disabled)",
        }),
    }
}

pub mod prelude {
    pub use crate::{Nestql, adapter_for};
    pub use nestql_core::{
        CompileOptions, Dialect, DialectAdapter, Entity, EntityDef, Executor, FieldType, Fields,
        Filter, Include, Pattern, RelationMeta, Related, Row, Schema, SchemaProvider, Where,
        compile, materialize,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapters_match_their_dialect() {
        for dialect in [Dialect::SQLite, Dialect::PostgreSQL, Dialect::MySQL] {
            assert_eq!(adapter_for(dialect).unwrap().dialect(), dialect);
        }
    }
}
