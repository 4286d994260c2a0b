//! Dialect adapter: the backend-specific half of SQL generation.
//!
//! The compiler never branches on a backend name. It asks the adapter chosen
//! at construction time for pattern matching, JSON aggregation and quoting.

pub use nestql_types::Dialect;

use crate::error::{NestqlError, Result};
use crate::filter::Pattern;

/// One key/value pair of a JSON object aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonField {
    /// JSON key (the logical field or relation name).
    pub key: String,
    /// SQL expression producing the value.
    pub expr: String,
}

impl JsonField {
    pub fn new(key: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expr: expr.into(),
        }
    }
}

/// Backend capabilities used by the compiler.
///
/// Quoting has defaults derived from [`Dialect`]. JSON aggregation defaults to
/// an [`NestqlError::UnsupportedBackend`] error so an adapter without it fails
/// compilation instead of producing invalid SQL.
pub trait DialectAdapter {
    fn dialect(&self) -> Dialect;

    /// Quotes a table or column name.
    fn quote_ident(&self, ident: &str) -> String {
        let q = self.dialect().identifier_quote();
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(q);
        for c in ident.chars() {
            if c == q {
                out.push(q);
            }
            out.push(c);
        }
        out.push(q);
        out
    }

    /// Quotes a string literal.
    fn quote_str(&self, value: &str) -> String {
        let backslashes = self.dialect().escapes_backslashes();
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' if backslashes => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    /// `column LIKE pattern` for the three pattern flavours.
    fn compare_like(&self, column: &str, pattern: &Pattern) -> Result<String>;

    /// Negation of [`DialectAdapter::compare_like`].
    fn compare_not_like(&self, column: &str, pattern: &Pattern) -> Result<String>;

    /// Aggregate that serializes `fields` of a single row as a JSON object.
    fn aggregate_object(&self, _fields: &[JsonField]) -> Result<String> {
        Err(NestqlError::UnsupportedBackend {
            dialect: self.dialect().as_str(),
            feature: "JSON object construction",
        })
    }

    /// Aggregate that serializes `fields` of every row as a JSON array of objects.
    ///
    /// `order` is the level's rendered `ORDER BY` list. Adapters whose array
    /// aggregate accepts an ordering use it to fix the element order; the rows
    /// also arrive sorted from a derived table.
    fn aggregate_array(&self, _fields: &[JsonField], _order: Option<&str>) -> Result<String> {
        Err(NestqlError::UnsupportedBackend {
            dialect: self.dialect().as_str(),
            feature: "JSON array aggregation",
        })
    }

    /// True when an ordered array aggregate is a window function. Every row of
    /// such a level carries the whole array, so the level is cut to one row.
    fn windowed_array(&self) -> bool {
        false
    }

    /// Wraps a relation subquery so it can be used as a JSON value.
    fn embed_subquery(&self, sql: &str) -> String {
        format!("({sql})")
    }

    /// `'key', expr, 'key', expr, ...` argument list shared by the JSON object
    /// constructors of every backend.
    fn json_pairs(&self, fields: &[JsonField]) -> String {
        let mut out = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.quote_str(&field.key));
            out.push_str(", ");
            out.push_str(&field.expr);
        }
        out
    }
}

impl<D: DialectAdapter + ?Sized> DialectAdapter for Box<D> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn quote_ident(&self, ident: &str) -> String {
        (**self).quote_ident(ident)
    }

    fn quote_str(&self, value: &str) -> String {
        (**self).quote_str(value)
    }

    fn compare_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        (**self).compare_like(column, pattern)
    }

    fn compare_not_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        (**self).compare_not_like(column, pattern)
    }

    fn aggregate_object(&self, fields: &[JsonField]) -> Result<String> {
        (**self).aggregate_object(fields)
    }

    fn aggregate_array(&self, fields: &[JsonField], order: Option<&str>) -> Result<String> {
        (**self).aggregate_array(fields, order)
    }

    fn windowed_array(&self) -> bool {
        (**self).windowed_array()
    }

    fn embed_subquery(&self, sql: &str) -> String {
        (**self).embed_subquery(sql)
    }
}
