//! The boolean predicate tree of a filter's `where`.

use crate::literal::Literal;

/// Operand of `like` / `notLike`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// SQL `LIKE` pattern (`%` and `_` wildcards).
    Like {
        pattern: String,
        case_insensitive: bool,
    },
    /// Regular expression, matched with the backend's native regex support.
    Regex {
        source: String,
        case_insensitive: bool,
    },
}

impl Pattern {
    /// Case-sensitive `LIKE` pattern.
    pub fn like(pattern: impl Into<String>) -> Self {
        Pattern::Like {
            pattern: pattern.into(),
            case_insensitive: false,
        }
    }

    /// Case-insensitive `LIKE` pattern.
    pub fn ilike(pattern: impl Into<String>) -> Self {
        Pattern::Like {
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    pub fn regex(source: impl Into<String>) -> Self {
        Pattern::Regex {
            source: source.into(),
            case_insensitive: false,
        }
    }

    /// Parses the `/source/flags` notation; anything else is a `LIKE` pattern.
    pub fn parse(text: &str, case_insensitive: bool) -> Self {
        if let Some(rest) = text.strip_prefix('/') {
            if let Some(end) = rest.rfind('/') {
                let flags = &rest[end + 1..];
                if end > 0 && flags.chars().all(|c| "gimsuy".contains(c)) {
                    return Pattern::Regex {
                        source: rest[..end].to_string(),
                        case_insensitive: case_insensitive || flags.contains('i'),
                    };
                }
            }
        }
        Pattern::Like {
            pattern: text.to_string(),
            case_insensitive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Eq(Literal),
    IsNull,
    IsNotNull,
    Gt(Literal),
    Gte(Literal),
    Lt(Literal),
    Lte(Literal),
    Between(Literal, Literal),
    In(Vec<Literal>),
    NotIn(Vec<Literal>),
    Neq(Literal),
    Like(Pattern),
    NotLike(Pattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
}

/// A predicate: boolean groups over field conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    And(Vec<Where>),
    Or(Vec<Where>),
    Condition(Condition),
}

impl Where {
    pub fn cond(field: impl Into<String>, op: Op) -> Self {
        Where::Condition(Condition {
            field: field.into(),
            op,
        })
    }

    pub fn and(children: impl IntoIterator<Item = Where>) -> Self {
        Where::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Where>) -> Self {
        Where::Or(children.into_iter().collect())
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Eq(value.into()))
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Neq(value.into()))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::cond(field, Op::IsNull)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::cond(field, Op::IsNotNull)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Gt(value.into()))
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Gte(value.into()))
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Lt(value.into()))
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::cond(field, Op::Lte(value.into()))
    }

    pub fn between(
        field: impl Into<String>,
        low: impl Into<Literal>,
        high: impl Into<Literal>,
    ) -> Self {
        Self::cond(field, Op::Between(low.into(), high.into()))
    }

    pub fn in_list<L: Into<Literal>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = L>,
    ) -> Self {
        Self::cond(field, Op::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<L: Into<Literal>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = L>,
    ) -> Self {
        Self::cond(field, Op::NotIn(values.into_iter().map(Into::into).collect()))
    }

    pub fn like(field: impl Into<String>, pattern: Pattern) -> Self {
        Self::cond(field, Op::Like(pattern))
    }

    pub fn not_like(field: impl Into<String>, pattern: Pattern) -> Self {
        Self::cond(field, Op::NotLike(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_notation_is_a_regex() {
        assert_eq!(Pattern::parse("/Jo.*/", false), Pattern::regex("Jo.*"));
        assert_eq!(
            Pattern::parse("/^jo/i", false),
            Pattern::Regex {
                source: "^jo".to_string(),
                case_insensitive: true
            }
        );
    }

    #[test]
    fn other_text_is_a_like_pattern() {
        assert_eq!(Pattern::parse("Jo%", false), Pattern::like("Jo%"));
        assert_eq!(Pattern::parse("Jo%", true), Pattern::ilike("Jo%"));
        assert_eq!(Pattern::parse("/usr/%", false), Pattern::like("/usr/%"));
        assert_eq!(Pattern::parse("//", false), Pattern::like("//"));
    }
}
