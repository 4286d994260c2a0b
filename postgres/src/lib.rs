//! PostgreSQL backend for nestql.

mod dialect;

#[cfg(feature = "tokio-postgres")]
pub mod tokio;

pub use dialect::PostgresDialect;
