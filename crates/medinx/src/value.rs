//! Typed attribute values.
//!
//! Every value held by a [`Document`](crate::document::Document) is one of
//! four variants. Integers and floats are the same variant ([`Value::Number`]),
//! and a `#`-prefixed string becomes a [`Value::Timestamp`] at load time.
//!
//! ## Ordering
//!
//! | Variant | Ordering |
//! |---------|----------|
//! | `Number` | IEEE (`NaN` is unordered) |
//! | `Text` | code-point lexicographic |
//! | `Boolean` | `false < true` |
//! | `Timestamp` | chronological, offset-aware |
//!
//! Values of different variants never compare.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

use crate::timestamp::{format_timestamp, parse_timestamp};

/// The tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Number,
    Text,
    Boolean,
    Timestamp,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Number => "number",
            Variant::Text => "text",
            Variant::Boolean => "boolean",
            Variant::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
}

/// An ordered list of values; homogeneous once validated.
pub type ValueList = Vec<Value>;

impl Value {
    pub fn variant(&self) -> Variant {
        match self {
            Value::Number(_) => Variant::Number,
            Value::Text(_) => Variant::Text,
            Value::Boolean(_) => Variant::Boolean,
            Value::Timestamp(_) => Variant::Timestamp,
        }
    }

    /// Orders two values of the same variant.
    ///
    /// Returns `None` for values of different variants and for `NaN`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Converts a query literal to `variant`.
    ///
    /// - `Timestamp`: ISO-8601, with or without the leading `#`
    /// - `Boolean`: `true` or `false`, case-insensitive
    /// - `Number`: any float literal
    /// - `Text`: the literal itself
    ///
    /// Returns `None` when the literal has no reading in `variant`.
    pub fn from_literal(literal: &str, variant: Variant) -> Option<Value> {
        match variant {
            Variant::Timestamp => {
                let payload = literal.strip_prefix('#').unwrap_or(literal);
                parse_timestamp(payload).ok().map(Value::Timestamp)
            }
            Variant::Boolean => parse_bool(literal).map(Value::Boolean),
            Variant::Number => literal.parse::<f64>().ok().map(Value::Number),
            Variant::Text => Some(Value::Text(literal.to_string())),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

/// Canonical text form: numbers keep a fractional part when integral,
/// timestamps are `#`-prefixed.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => write!(f, "#{}", format_timestamp(ts)),
        }
    }
}

/// Side-car representation: timestamps go back to `#`-prefixed strings.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Timestamp(ts) => serializer.serialize_str(&format!("#{}", format_timestamp(ts))),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(ts)
    }
}

/// The variant shared by every value of `values`.
///
/// `Ok(None)` for an empty list; `Err((first, other))` names the first
/// variant and the first one that differs from it.
pub fn common_variant(values: &[Value]) -> Result<Option<Variant>, (Variant, Variant)> {
    let Some(first) = values.first().map(Value::variant) else {
        return Ok(None);
    };
    match values.iter().map(Value::variant).find(|v| *v != first) {
        Some(other) => Err((first, other)),
        None => Ok(Some(first)),
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Shortest text that parses back to `n`, keeping `.0` on integral values.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}
