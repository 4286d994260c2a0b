//! Declarative query filter: projection, predicate, ordering, pagination and
//! the include graph.
//!
//! Filters are built fluently or parsed from the LoopBack-style JSON syntax
//! (see [`Filter::from_json`]).

mod json;
mod predicate;

pub use predicate::{Condition, Op, Pattern, Where};

use crate::error::{NestqlError, Result};

/// Field projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    /// Only these fields, in this order.
    Only(Vec<String>),
    /// Every schema field except these.
    Except(Vec<String>),
}

impl Fields {
    pub fn only<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Fields::Only(fields.into_iter().map(Into::into).collect())
    }

    pub fn except<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Fields::Except(fields.into_iter().map(Into::into).collect())
    }
}

/// Applies an optional projection to the schema's field list.
pub(crate) fn project<'a>(fields: Option<&'a Fields>, all: Vec<&'a str>) -> Vec<&'a str> {
    match fields {
        None => all,
        Some(Fields::Only(only)) => only.iter().map(String::as_str).collect(),
        Some(Fields::Except(except)) => all
            .into_iter()
            .filter(|f| !except.iter().any(|e| e == f))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Option<Direction>,
}

impl OrderBy {
    /// Parses `field [ASC|DESC]`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| NestqlError::InvalidOrder(text.to_string()))?;
        let direction = match parts.next() {
            None => None,
            Some(d) if d.eq_ignore_ascii_case("asc") => Some(Direction::Asc),
            Some(d) if d.eq_ignore_ascii_case("desc") => Some(Direction::Desc),
            Some(_) => return Err(NestqlError::InvalidOrder(text.to_string())),
        };
        if parts.next().is_some() {
            return Err(NestqlError::InvalidOrder(text.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// A named edge into the relation graph, optionally with its own filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub relation: String,
    pub scope: Option<Box<Filter>>,
}

impl Include {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            scope: None,
        }
    }

    pub fn scope(mut self, scope: Filter) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub r#where: Option<Where>,
    pub order: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub fields: Option<Fields>,
    pub include: Vec<Include>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn r#where(mut self, predicate: Where) -> Self {
        self.r#where = Some(predicate);
        self
    }

    /// Appends an ORDER BY entry written as `field [ASC|DESC]`.
    pub fn order(mut self, entry: &str) -> Result<Self> {
        self.order.push(OrderBy::parse(entry)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parsing() {
        assert_eq!(
            OrderBy::parse("name DESC").unwrap(),
            OrderBy {
                field: "name".to_string(),
                direction: Some(Direction::Desc)
            }
        );
        assert_eq!(OrderBy::parse("  id ").unwrap().direction, None);
        assert_eq!(OrderBy::parse("id asc").unwrap().direction, Some(Direction::Asc));
        assert!(OrderBy::parse("id sideways").is_err());
        assert!(OrderBy::parse("id; DROP TABLE x").is_err());
        assert!(OrderBy::parse("").is_err());
    }

    #[test]
    fn projection_modes() {
        let all = vec!["id", "name", "email"];
        assert_eq!(project(None, all.clone()), all);

        let only = Fields::only(["email", "id"]);
        assert_eq!(project(Some(&only), all.clone()), vec!["email", "id"]);

        let except = Fields::except(["name"]);
        assert_eq!(project(Some(&except), all), vec!["id", "email"]);
    }

    #[test]
    fn builder_collects_clauses() {
        let filter = Filter::new()
            .r#where(Where::eq("status", "A"))
            .order("name DESC")
            .unwrap()
            .limit(10)
            .skip(20)
            .include(Include::new("orders").scope(Filter::new().limit(2)));

        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.skip, Some(20));
        assert_eq!(filter.order.len(), 1);
        assert_eq!(filter.include[0].relation, "orders");
        assert_eq!(filter.include[0].scope.as_ref().unwrap().limit, Some(2));
    }
}
