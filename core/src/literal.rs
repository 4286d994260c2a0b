//! SQL literal formatting.
//!
//! Every caller-supplied value reaches SQL text through [`format_literal`]:
//! strings are quoted and escaped by the dialect, numbers are printed
//! textually, and date-typed fields are normalized to
//! `'YYYY-MM-DD HH:MM:SS'`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::dialect::DialectAdapter;
use crate::error::{NestqlError, Result};
use crate::schema::FieldType;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scalar operand in a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl Literal {
    /// Converts a scalar JSON value; arrays, objects and null have no literal form.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Literal::Int)
                .or_else(|| n.as_u64().map(Literal::UInt))
                .or_else(|| n.as_f64().map(Literal::Float)),
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The literal as a timestamp, or the reason it is not one.
    fn to_datetime(&self) -> std::result::Result<NaiveDateTime, String> {
        match self {
            Literal::DateTime(dt) => Ok(*dt),
            Literal::String(s) => parse_datetime(s).ok_or_else(|| format!("{s:?} is not a date")),
            Literal::Int(ms) => from_millis(*ms),
            Literal::UInt(ms) => i64::try_from(*ms)
                .map_err(|_| out_of_range(ms))
                .and_then(from_millis),
            // `as` saturates, so the range is checked first
            Literal::Float(ms) if ms.is_finite() => {
                if *ms < i64::MIN as f64 || *ms >= i64::MAX as f64 {
                    Err(out_of_range(ms))
                } else {
                    from_millis(ms.trunc() as i64)
                }
            }
            Literal::Float(ms) => Err(format!("{ms} is not a finite number")),
            Literal::Bool(b) => Err(format!("{b} is not a date")),
        }
    }
}

fn from_millis(ms: i64) -> std::result::Result<NaiveDateTime, String> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| out_of_range(&ms))
}

fn out_of_range(ms: &dyn std::fmt::Display) -> String {
    format!("epoch milliseconds {ms} out of range")
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

macro_rules! literal_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::$variant(value.into())
                }
            }
        )*
    };
}

literal_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => UInt,
    u64 => UInt,
    f64 => Float,
    String => String,
    &str => String,
    NaiveDateTime => DateTime,
}

/// Formats `literal` for comparison against `field` of type `field_type`.
pub fn format_literal<D: DialectAdapter + ?Sized>(
    dialect: &D,
    field: &str,
    field_type: FieldType,
    literal: &Literal,
) -> Result<String> {
    if field_type == FieldType::Date {
        let dt = literal.to_datetime().map_err(|reason| NestqlError::InvalidLiteral {
            field: field.to_string(),
            reason,
        })?;
        return Ok(dialect.quote_str(&dt.format(DATE_FORMAT).to_string()));
    }

    Ok(match literal {
        Literal::Bool(true) => "TRUE".to_string(),
        Literal::Bool(false) => "FALSE".to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::UInt(n) => n.to_string(),
        Literal::Float(n) if n.is_finite() => n.to_string(),
        Literal::Float(n) => {
            return Err(NestqlError::InvalidLiteral {
                field: field.to_string(),
                reason: format!("{n} is not a finite number"),
            });
        }
        Literal::String(s) => dialect.quote_str(s),
        Literal::DateTime(dt) => dialect.quote_str(&dt.format(DATE_FORMAT).to_string()),
    })
}
