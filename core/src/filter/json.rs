//! LoopBack-style JSON filter syntax.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};

use super::{Fields, Filter, Include, OrderBy, Op, Pattern, Where};
use crate::error::{NestqlError, Result};
use crate::literal::Literal;

impl Filter {
    /// Parses a filter from its JSON form.
    ///
    /// ```
    /// use nestql_core::filter::Filter;
    /// use serde_json::json;
    ///
    /// let filter = Filter::from_json(&json!({
    ///     "where": {"and": [{"status": "A"}, {"age": {"gte": 18}}]},
    ///     "order": "name DESC",
    ///     "limit": 10,
    ///     "include": {"relation": "orders", "scope": {"limit": 2}},
    /// })).unwrap();
    /// assert_eq!(filter.limit, Some(10));
    /// assert_eq!(filter.include[0].relation, "orders");
    /// ```
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = match value {
            Value::Null => return Ok(Filter::default()),
            Value::Object(obj) => obj,
            other => return Err(invalid(format!("filter must be an object, got {other}"))),
        };

        let mut filter = Filter::default();
        for (key, value) in obj {
            match key.as_str() {
                "where" => filter.r#where = parse_where(value)?,
                "order" => filter.order = parse_order(value)?,
                "limit" => filter.limit = parse_count("limit", value)?,
                "skip" | "offset" => filter.skip = parse_count(key, value)?,
                "fields" => filter.fields = parse_fields(value)?,
                "include" => filter.include = parse_includes(value)?,
                other => return Err(invalid(format!("unknown filter key `{other}`"))),
            }
        }
        Ok(filter)
    }
}

impl TryFrom<Value> for Filter {
    type Error = NestqlError;

    fn try_from(value: Value) -> Result<Self> {
        Filter::from_json(&value)
    }
}

impl FromStr for Filter {
    type Err = NestqlError;

    fn from_str(s: &str) -> Result<Self> {
        Filter::from_json(&serde_json::from_str(s).map_err(|e| invalid(e.to_string()))?)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Filter::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn invalid(message: impl Into<String>) -> NestqlError {
    NestqlError::InvalidFilter(message.into())
}

fn unsupported(field: &str, operator: &str, operand: &Value) -> NestqlError {
    NestqlError::UnsupportedPredicate {
        field: field.to_string(),
        operator: operator.to_string(),
        fragment: json!({ field: operand }).to_string(),
    }
}

/// Negative counts mean "absent".
fn parse_count(key: &str, value: &Value) -> Result<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) if n.as_i64().is_some_and(|n| n < 0) => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| invalid(format!("`{key}` must be an integer, got {n}"))),
        other => Err(invalid(format!("`{key}` must be an integer, got {other}"))),
    }
}

fn parse_order(value: &Value) -> Result<Vec<OrderBy>> {
    let entries: Vec<&str> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| invalid(format!("order entries must be strings, got {item}")))
            })
            .collect::<Result<_>>()?,
        other => return Err(invalid(format!("order must be a string or array, got {other}"))),
    };
    entries.into_iter().map(OrderBy::parse).collect()
}

fn parse_fields(value: &Value) -> Result<Option<Fields>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let names = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(format!("field names must be strings, got {item}")))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((!names.is_empty()).then_some(Fields::Only(names)))
        }
        Value::Object(obj) => {
            let mut only = Vec::new();
            let mut except = Vec::new();
            for (name, flag) in obj {
                match flag {
                    Value::Bool(true) => only.push(name.clone()),
                    Value::Bool(false) => except.push(name.clone()),
                    other => {
                        return Err(invalid(format!("field `{name}` must map to a boolean, got {other}")));
                    }
                }
            }
            Ok(if !only.is_empty() {
                Some(Fields::Only(only))
            } else if !except.is_empty() {
                Some(Fields::Except(except))
            } else {
                None
            })
        }
        other => Err(invalid(format!("fields must be an object or array, got {other}"))),
    }
}

fn parse_includes(value: &Value) -> Result<Vec<Include>> {
    match value {
        Value::Null | Value::Bool(false) => Ok(Vec::new()),
        Value::String(name) => Ok(vec![Include::new(name.as_str())]),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(parse_includes(item)?);
            }
            Ok(out)
        }
        Value::Object(obj) => parse_include_object(obj),
        other => Err(invalid(format!("invalid include {other}"))),
    }
}

/// `{"relation": r, "scope": f}` or the shorthand `{"r": nested-includes}`.
fn parse_include_object(obj: &Map<String, Value>) -> Result<Vec<Include>> {
    if let Some(relation) = obj.get("relation").or_else(|| obj.get("rel")) {
        let name = relation
            .as_str()
            .ok_or_else(|| invalid(format!("include relation must be a string, got {relation}")))?;
        let mut include = Include::new(name);
        if let Some(scope) = obj.get("scope").filter(|s| !s.is_null()) {
            include = include.scope(Filter::from_json(scope)?);
        }
        return Ok(vec![include]);
    }

    obj.iter()
        .map(|(name, nested)| {
            let include = Include::new(name.as_str());
            Ok(match nested {
                Value::Bool(true) | Value::Null => include,
                nested => include.scope(Filter {
                    include: parse_includes(nested)?,
                    ..Filter::default()
                }),
            })
        })
        .collect()
}

fn parse_where(value: &Value) -> Result<Option<Where>> {
    let obj = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        other => return Err(invalid(format!("where must be an object, got {other}"))),
    };

    let mut parts = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        match key.as_str() {
            "and" | "or" => {
                let items = value
                    .as_array()
                    .filter(|items| !items.is_empty())
                    .ok_or_else(|| invalid(format!("`{key}` needs a non-empty array, got {value}")))?;
                let children = items
                    .iter()
                    .map(|item| {
                        parse_where(item)?
                            .ok_or_else(|| invalid(format!("empty clause inside `{key}`")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                parts.push(if key == "and" {
                    Where::And(children)
                } else {
                    Where::Or(children)
                });
            }
            field => parts.push(parse_field(field, value)?),
        }
    }

    Ok(match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Where::And(parts)),
    })
}

fn literal(field: &str, operator: &str, value: &Value) -> Result<Literal> {
    Literal::from_json(value).ok_or_else(|| unsupported(field, operator, value))
}

fn literal_list(field: &str, operator: &str, value: &Value) -> Result<Vec<Literal>> {
    value
        .as_array()
        .ok_or_else(|| unsupported(field, operator, value))?
        .iter()
        .map(|item| literal(field, operator, item))
        .collect()
}

fn parse_field(field: &str, value: &Value) -> Result<Where> {
    let ops = match value {
        Value::Null => return Ok(Where::is_null(field)),
        Value::Object(ops) => ops,
        scalar => return Ok(Where::cond(field, Op::Eq(literal(field, "eq", scalar)?))),
    };

    let case_insensitive = match ops.get("options") {
        None => false,
        Some(Value::String(flags)) => flags.contains('i'),
        Some(other) => return Err(unsupported(field, "options", other)),
    };

    let mut conditions = Vec::with_capacity(ops.len());
    for (operator, operand) in ops {
        let op = match operator.as_str() {
            "options" => continue,
            "eq" if operand.is_null() => Op::IsNull,
            "eq" => Op::Eq(literal(field, operator, operand)?),
            "neq" | "ne" if operand.is_null() => Op::IsNotNull,
            "neq" | "ne" => Op::Neq(literal(field, operator, operand)?),
            "gt" => Op::Gt(literal(field, operator, operand)?),
            "gte" => Op::Gte(literal(field, operator, operand)?),
            "lt" => Op::Lt(literal(field, operator, operand)?),
            "lte" => Op::Lte(literal(field, operator, operand)?),
            "between" => match literal_list(field, operator, operand)?.as_slice() {
                [low, high] => Op::Between(low.clone(), high.clone()),
                _ => return Err(unsupported(field, operator, operand)),
            },
            "inq" | "in" => Op::In(literal_list(field, operator, operand)?),
            "nin" | "notIn" => Op::NotIn(literal_list(field, operator, operand)?),
            "like" => Op::Like(pattern(field, operator, operand, case_insensitive)?),
            "nlike" | "notLike" => Op::NotLike(pattern(field, operator, operand, case_insensitive)?),
            "ilike" => Op::Like(pattern(field, operator, operand, true)?),
            "nilike" => Op::NotLike(pattern(field, operator, operand, true)?),
            "regexp" => Op::Like(regex(field, operator, operand, case_insensitive)?),
            _ => return Err(unsupported(field, operator, operand)),
        };
        conditions.push(Where::cond(field, op));
    }

    match conditions.len() {
        0 => Err(unsupported(field, "{}", value)),
        1 => Ok(conditions.remove(0)),
        _ => Ok(Where::And(conditions)),
    }
}

fn pattern(field: &str, operator: &str, operand: &Value, case_insensitive: bool) -> Result<Pattern> {
    operand
        .as_str()
        .map(|text| Pattern::parse(text, case_insensitive))
        .ok_or_else(|| unsupported(field, operator, operand))
}

fn regex(field: &str, operator: &str, operand: &Value, case_insensitive: bool) -> Result<Pattern> {
    match pattern(field, operator, operand, case_insensitive)? {
        regex @ Pattern::Regex { .. } => Ok(regex),
        Pattern::Like {
            pattern,
            case_insensitive,
        } => Ok(Pattern::Regex {
            source: pattern,
            case_insensitive,
        }),
    }
}
