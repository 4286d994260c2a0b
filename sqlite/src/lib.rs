//! SQLite backend for nestql.
//!
//! [`SQLiteDialect`] renders JSON aggregation with SQLite's JSON1 functions.
//! With the `rusqlite` feature, [`rusqlite::RusqliteExecutor`] runs compiled
//! statements in-process and provides the `regexp` function the dialect's
//! regex matching relies on.

mod dialect;

#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub use dialect::{SQLiteDialect, like_to_glob};
