//! Filter → SQL compilation.
//!
//! The pipeline: [`QueryCompiler::compile`] assembles the root statement,
//! every include is rendered by the relation compiler into a correlated
//! scalar subquery (recursing into the statement compiler), and the whole
//! include graph comes back as one SQL string whose single `data` column holds
//! JSON objects or arrays.
//!
//! Aliases are threaded by value through every recursive call, so sibling
//! includes are compiled strictly in declaration order and never share
//! counter state.

mod predicate;
mod relation;
mod statement;

use core::fmt;

use crate::alias::{Alias, AliasCounter};
use crate::dialect::DialectAdapter;
use crate::error::Result;
use crate::filter::Filter;
use crate::schema::SchemaProvider;

use statement::Level;

/// Caller-supplied context for the root statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Alias index of the root table.
    pub alias: u32,
    /// Pre-existing join clause appended after the root table.
    pub join: Option<String>,
    /// Pre-existing correlation predicate AND-ed into the root WHERE.
    pub sub_where: Option<String>,
    /// Aggregate the root rows into one JSON array instead of one object per row.
    pub multiple: bool,
}

impl CompileOptions {
    pub fn multiple() -> Self {
        Self {
            multiple: true,
            ..Self::default()
        }
    }
}

/// A compiled SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    sql: String,
}

impl CompiledStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Compiles filters against one schema for one backend.
pub struct QueryCompiler<'a, S: ?Sized, D: ?Sized> {
    schema: &'a S,
    dialect: &'a D,
}

impl<'a, S, D> QueryCompiler<'a, S, D>
where
    S: SchemaProvider + ?Sized,
    D: DialectAdapter + ?Sized,
{
    pub fn new(schema: &'a S, dialect: &'a D) -> Self {
        Self { schema, dialect }
    }

    /// Compiles `filter` on `entity` into a single statement.
    pub fn compile(
        &self,
        entity: &str,
        filter: &Filter,
        options: &CompileOptions,
    ) -> Result<CompiledStatement> {
        let alias = Alias::new(options.alias);
        let level = Level {
            alias,
            join: options.join.as_deref(),
            sub_where: options.sub_where.as_deref(),
            multiple: options.multiple,
            implicit_limit: None,
        };
        let (sql, _) = self.statement(entity, filter, &level, AliasCounter::starting_at(alias))?;
        Ok(CompiledStatement { sql })
    }

    /// `_n."column"` for a logical field of `entity`.
    fn column(&self, entity: &str, alias: Alias, field: &str) -> String {
        format!(
            "{alias}.{}",
            self.dialect.quote_ident(self.schema.column_name(entity, field))
        )
    }
}

/// Shorthand for [`QueryCompiler::compile`].
pub fn compile<S, D>(
    schema: &S,
    dialect: &D,
    entity: &str,
    filter: &Filter,
    options: &CompileOptions,
) -> Result<CompiledStatement>
where
    S: SchemaProvider + ?Sized,
    D: DialectAdapter + ?Sized,
{
    QueryCompiler::new(schema, dialect).compile(entity, filter, options)
}
