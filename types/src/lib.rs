//! Shared type definitions for nestql.
//!
//! - [`Dialect`] - Database dialect enum (SQLite, PostgreSQL, MySQL)
//!
//! # Features
//!
//! - `serde` - Enable serde deserialization of [`Dialect`] from config files

mod dialect;

pub use dialect::{Dialect, DialectParseError};
