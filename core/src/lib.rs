//! Compiler and materializer behind `nestql`.
//!
//! A [`Filter`](filter::Filter) names an entity's projection, predicate,
//! ordering, pagination and include graph. [`QueryCompiler`] turns it into a
//! single SQL statement whose `data` column carries the whole graph as JSON,
//! and [`materialize`] parses those rows back into [`Entity`] values.

pub mod alias;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod filter;
pub mod literal;
pub mod materialize;
pub mod query;
pub mod schema;
mod tracing;

pub use alias::{Alias, AliasCounter};
pub use dialect::{Dialect, DialectAdapter, JsonField};
pub use error::{NestqlError, Result};
pub use executor::{Executor, Row};
pub use filter::{Direction, Fields, Filter, Include, OrderBy, Pattern, Where};
pub use literal::{Literal, format_literal};
pub use materialize::{Entity, Related, materialize};
pub use query::{CompileOptions, CompiledStatement, QueryCompiler, compile};
pub use schema::{EntityDef, FieldType, Multiplicity, RelationKind, RelationMeta, Schema, SchemaProvider, Through};
