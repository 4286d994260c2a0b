//! Unified database dialect enum
//!
//! The single source of truth for backend identification: the CLI config, the
//! dialect dispatch in the `nestql` facade and every adapter crate agree on it.

/// SQL dialect for backend-specific SQL generation
///
/// Each dialect has its own identifier quoting, string escaping, pattern
/// matching operators and JSON aggregation functions.
///
/// # Examples
///
/// ```
/// use nestql_types::Dialect;
///
/// let dialect = Dialect::MySQL;
/// assert_eq!(dialect.identifier_quote(), '`');
/// assert!(dialect.escapes_backslashes());
///
/// let sqlite = Dialect::SQLite;
/// assert_eq!(sqlite.identifier_quote(), '"');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// SQLite - `json_object` / `json_group_array`
    ///
    /// Compatible with: rusqlite
    #[default]
    SQLite,

    /// PostgreSQL - `json_build_object` / `json_agg`
    ///
    /// Compatible with: tokio-postgres
    #[cfg_attr(feature = "serde", serde(alias = "postgres", alias = "pg"))]
    PostgreSQL,

    /// MySQL - `JSON_OBJECT` / `JSON_ARRAYAGG`
    MySQL,
}

impl Dialect {
    /// Character used to quote identifiers (table and column names)
    #[inline]
    #[must_use]
    pub const fn identifier_quote(&self) -> char {
        match self {
            Dialect::MySQL => '`',
            Dialect::SQLite | Dialect::PostgreSQL => '"',
        }
    }

    /// Returns `true` if backslash is an escape character inside string literals
    ///
    /// MySQL treats `\` as an escape by default; SQLite and PostgreSQL (with
    /// `standard_conforming_strings`) do not.
    #[inline]
    #[must_use]
    pub const fn escapes_backslashes(&self) -> bool {
        matches!(self, Dialect::MySQL)
    }

    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports various common aliases:
    /// - SQLite: `"sqlite"`, `"sqlite3"`
    /// - PostgreSQL: `"postgresql"`, `"postgres"`, `"pg"`
    /// - MySQL: `"mysql"`, `"mariadb"`
    ///
    /// # Examples
    ///
    /// ```
    /// use nestql_types::Dialect;
    ///
    /// assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
    /// assert_eq!(Dialect::parse("postgres"), Some(Dialect::PostgreSQL));
    /// assert_eq!(Dialect::parse("pg"), Some(Dialect::PostgreSQL));
    /// assert_eq!(Dialect::parse("oracle"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("sqlite") || s.eq_ignore_ascii_case("sqlite3") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else if s.eq_ignore_ascii_case("mysql") || s.eq_ignore_ascii_case("mariadb") {
            Some(Dialect::MySQL)
        } else {
            None
        }
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
            Dialect::MySQL => "mysql",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| DialectParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown dialect string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectParseError(pub String);

impl core::fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown dialect `{}`", self.0)
    }
}

impl std::error::Error for DialectParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("SQLite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("sqlite3"), Some(Dialect::SQLite));

        assert_eq!(Dialect::parse("postgresql"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("postgres"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("PG"), Some(Dialect::PostgreSQL));

        assert_eq!(Dialect::parse("mysql"), Some(Dialect::MySQL));
        assert_eq!(Dialect::parse("MariaDB"), Some(Dialect::MySQL));

        assert_eq!(Dialect::parse("unknown"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_dialect_from_str_error_names_input() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert_eq!(err.to_string(), "unknown dialect `oracle`");
    }

    #[test]
    fn test_dialect_quoting_rules() {
        assert_eq!(Dialect::SQLite.identifier_quote(), '"');
        assert_eq!(Dialect::PostgreSQL.identifier_quote(), '"');
        assert_eq!(Dialect::MySQL.identifier_quote(), '`');
        assert!(!Dialect::PostgreSQL.escapes_backslashes());
        assert!(Dialect::MySQL.escapes_backslashes());
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(format!("{}", Dialect::SQLite), "sqlite");
        assert_eq!(format!("{}", Dialect::PostgreSQL), "postgresql");
        assert_eq!(format!("{}", Dialect::MySQL), "mysql");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_dialect_deserialize_aliases() {
        #[derive(serde::Deserialize)]
        struct Config {
            dialect: Dialect,
        }

        let config: Config = toml::from_str(r#"dialect = "postgres""#).unwrap();
        assert_eq!(config.dialect, Dialect::PostgreSQL);
        let config: Config = toml::from_str(r#"dialect = "mysql""#).unwrap();
        assert_eq!(config.dialect, Dialect::MySQL);
    }
}
