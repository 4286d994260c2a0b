use nestql_core::dialect::{Dialect, DialectAdapter, JsonField};
use nestql_core::error::Result;
use nestql_core::filter::Pattern;

/// SQLite dialect adapter.
///
/// `LIKE` is case-insensitive in SQLite, so case-sensitive patterns are
/// rewritten to `GLOB`. Regex matching calls a `regexp(pattern, text)`
/// function that the connection has to provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SQLiteDialect;

impl SQLiteDialect {
    fn matches(&self, column: &str, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Like {
                pattern,
                case_insensitive: true,
            } => format!("{column} LIKE {}", self.quote_str(pattern)),
            Pattern::Like { pattern, .. } => {
                format!("{column} GLOB {}", self.quote_str(&like_to_glob(pattern)))
            }
            Pattern::Regex {
                source,
                case_insensitive,
            } => {
                let source = if *case_insensitive {
                    format!("(?i){source}")
                } else {
                    source.clone()
                };
                format!("regexp({}, {column})", self.quote_str(&source))
            }
        }
    }
}

impl DialectAdapter for SQLiteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn compare_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        Ok(self.matches(column, pattern))
    }

    fn compare_not_like(&self, column: &str, pattern: &Pattern) -> Result<String> {
        Ok(format!("NOT {}", self.matches(column, pattern)))
    }

    fn aggregate_object(&self, fields: &[JsonField]) -> Result<String> {
        Ok(format!("json_object({})", self.json_pairs(fields)))
    }

    /// Element order comes from the derived table the level selects from.
    fn aggregate_array(&self, fields: &[JsonField], _order: Option<&str>) -> Result<String> {
        Ok(format!(
            "json_group_array(json_object({}))",
            self.json_pairs(fields)
        ))
    }

    /// Subquery results lose their JSON subtype; `json()` restores it so the
    /// parent embeds the value instead of a quoted string.
    fn embed_subquery(&self, sql: &str) -> String {
        format!("json(({sql}))")
    }
}

/// Translates a `LIKE` pattern into an equivalent `GLOB` pattern.
pub fn like_to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' => out.push('*'),
            '_' => out.push('?'),
            '*' => out.push_str("[*]"),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_translation() {
        assert_eq!(like_to_glob("Jo%"), "Jo*");
        assert_eq!(like_to_glob("J_n"), "J?n");
        assert_eq!(like_to_glob("a*b?c[d"), "a[*]b[?]c[[]d");
    }

    #[test]
    fn pattern_flavours() {
        let d = SQLiteDialect;
        assert_eq!(
            d.compare_like("_0.\"name\"", &Pattern::ilike("jo%")).unwrap(),
            "_0.\"name\" LIKE 'jo%'"
        );
        assert_eq!(
            d.compare_like("_0.\"name\"", &Pattern::like("Jo%")).unwrap(),
            "_0.\"name\" GLOB 'Jo*'"
        );
        assert_eq!(
            d.compare_not_like("_0.\"name\"", &Pattern::regex("^J")).unwrap(),
            "NOT regexp('^J', _0.\"name\")"
        );
        assert_eq!(
            d.compare_like("_0.\"name\"", &Pattern::parse("/^j/i", false)).unwrap(),
            "regexp('(?i)^j', _0.\"name\")"
        );
    }

    #[test]
    fn json_functions() {
        let d = SQLiteDialect;
        let fields = [JsonField::new("id", "_0.\"id\"")];
        assert_eq!(d.aggregate_object(&fields).unwrap(), "json_object('id', _0.\"id\")");
        assert_eq!(
            d.aggregate_array(&fields, Some("_0.\"id\"")).unwrap(),
            "json_group_array(json_object('id', _0.\"id\"))"
        );
        assert_eq!(d.embed_subquery("SELECT 1"), "json((SELECT 1))");
    }
}
