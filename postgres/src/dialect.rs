use nestql_core::dialect::{Dialect, DialectAdapter, JsonField};
use nestql_core::error::Result;
use nestql_core::filter::Pattern;

/// PostgreSQL dialect adapter: `json_build_object` / `json_agg`, `ILIKE`
/// and POSIX regex operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresDialect;

impl PostgresDialect {
    fn operator(pattern: &Pattern, negated: bool) -> (&'static str, &str) {
        match (pattern, negated) {
            (Pattern::Like { pattern, case_insensitive: true }, false) => ("ILIKE", pattern),
            (Pattern::Like { pattern, case_insensitive: true }, true) => ("NOT ILIKE", pattern),
            (Pattern::Like { pattern, .. }, false) => ("LIKE", pattern),
            (Pattern::Like { pattern, .. }, true) => ("NOT LIKE", pattern),
            (Pattern::Regex { source, case_insensitive: true }, false) => ("~*", source),
            (Pattern::Regex { source, case_insensitive: true }, true) => ("!~*", source),
            (Pattern::Regex { source, .. }, false) => ("~", source),
            (Pattern::Regex { source, .. }, true) => ("!~", source),
        }
    }
}

impl DialectAdapter for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn compare_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        let (op, text) = Self::operator(pattern, false);
        Ok(format!("{column} {op} {}", self.quote_str(text)))
    }

    fn compare_not_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        let (op, text) = Self::operator(pattern, true);
        Ok(format!("{column} {op} {}", self.quote_str(text)))
    }

    fn aggregate_object(&self, fields: &[JsonField]) -> Result<String> {
        Ok(format!("json_build_object({})", self.json_pairs(fields)))
    }

    /// `json_agg` over zero rows is NULL; an empty relation reads as `[]`.
    /// Input order of an aggregate is unspecified, so the ordering goes inside.
    fn aggregate_array(&self, fields: &[JsonField], order: Option<&str>) -> Result<String> {
        let order = order.map(|o| format!(" ORDER BY {o}")).unwrap_or_default();
        Ok(format!(
            "COALESCE(json_agg(json_build_object({}){order}), '[]'::json)",
            self.json_pairs(fields)
        ))
    }
}
