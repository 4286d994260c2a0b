//! MySQL backend for nestql.

use nestql_core::dialect::{Dialect, DialectAdapter, JsonField};
use nestql_core::error::Result;
use nestql_core::filter::Pattern;

/// MySQL 8 dialect adapter.
///
/// Identifiers are quoted with backticks and backslashes in string literals
/// are escaped. Case-sensitive `LIKE` compares as `LIKE BINARY`; regexes use
/// `REGEXP_LIKE` with an explicit match type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySqlDialect;

impl MySqlDialect {
    fn matches(&self, column: &str, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Like {
                pattern,
                case_insensitive: true,
            } => format!("{column} LIKE {}", self.quote_str(pattern)),
            Pattern::Like { pattern, .. } => {
                format!("{column} LIKE BINARY {}", self.quote_str(pattern))
            }
            Pattern::Regex {
                source,
                case_insensitive,
            } => format!(
                "REGEXP_LIKE({column}, {}, '{}')",
                self.quote_str(source),
                if *case_insensitive { 'i' } else { 'c' }
            ),
        }
    }
}

impl DialectAdapter for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn compare_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        Ok(self.matches(column, pattern))
    }

    fn compare_not_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        Ok(match pattern {
            Pattern::Like {
                pattern,
                case_insensitive: true,
            } => format!("{column} NOT LIKE {}", self.quote_str(pattern)),
            Pattern::Like { pattern, .. } => {
                format!("{column} NOT LIKE BINARY {}", self.quote_str(pattern))
            }
            Pattern::Regex { .. } => format!("NOT {}", self.matches(column, pattern)),
        })
    }

    fn aggregate_object(&self, fields: &[JsonField]) -> Result<String> {
        Ok(format!("JSON_OBJECT({})", self.json_pairs(fields)))
    }

    /// `JSON_ARRAYAGG` element order is undefined as a plain aggregate. As a
    /// window function it follows the window's `ORDER BY`, and the full frame
    /// puts the complete array on every row.
    fn aggregate_array(&self, fields: &[JsonField], order: Option<&str>) -> Result<String> {
        let aggregate = format!("JSON_ARRAYAGG(JSON_OBJECT({}))", self.json_pairs(fields));
        Ok(match order {
            None => aggregate,
            Some(order) => format!(
                "{aggregate} OVER (ORDER BY {order} ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING)"
            ),
        })
    }

    fn windowed_array(&self) -> bool {
        true
    }
}
