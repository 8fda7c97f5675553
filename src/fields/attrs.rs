//! Lenient attribute access for loosely-typed upstream records.
//!
//! Upstream numbers arrive as JSON numbers, numeric strings, strings with unit
//! suffixes (`"14px"`), or garbage. Parsing takes the longest numeric prefix and
//! reports anything else as malformed so the caller can substitute a default.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    /// Leading integer, as `parseInt` reads it
    static ref RE_INT_PREFIX: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();

    /// Leading decimal with optional exponent
    static ref RE_FLOAT_PREFIX: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();

    /// `rgb`, `rrggbb` or `rrggbbaa` without the hash
    static ref RE_HEX_COLOR: Regex =
        Regex::new(r"^(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
}

/// Outcome of reading a numeric attribute.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Numeric<T> {
    /// Key missing, null, or empty string
    Absent,
    /// Parsed value
    Parsed(T),
    /// Present but not a number; holds the raw text
    Malformed(String),
}

impl<T> Numeric<T> {
    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, Numeric::Absent)
    }
}

/// Borrowed view over one upstream record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// The raw value, treating `null` and `""` as missing.
    pub(crate) fn raw(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// String form of a scalar attribute.
    pub(crate) fn text(&self, key: &str) -> Option<String> {
        self.raw(key).and_then(scalar_to_string)
    }

    pub(crate) fn text_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k))
    }

    pub(crate) fn int(&self, key: &str) -> Numeric<i64> {
        parse_int(self.raw(key))
    }

    pub(crate) fn float(&self, key: &str) -> Numeric<f64> {
        parse_float(self.raw(key))
    }

    /// `true` or `"true"` (case-insensitive); anything else is false.
    pub(crate) fn flag(&self, key: &str) -> bool {
        match self.raw(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Nested object attribute.
    pub(crate) fn object(&self, key: &str) -> Option<Record<'a>> {
        match self.map.get(key) {
            Some(Value::Object(map)) => Some(Record::new(map)),
            _ => None,
        }
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer parsing with `parseInt` leniency: `"12.9"` and `"12px"` give 12.
pub(crate) fn parse_int(value: Option<&Value>) -> Numeric<i64> {
    match value {
        None => Numeric::Absent,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Numeric::Parsed(i),
            None => match n.as_f64() {
                Some(f) if f.is_finite() => Numeric::Parsed(f.trunc() as i64),
                _ => Numeric::Malformed(n.to_string()),
            },
        },
        Some(Value::String(s)) => RE_INT_PREFIX
            .captures(s)
            .and_then(|c| c[1].parse::<i64>().ok())
            .map(Numeric::Parsed)
            .unwrap_or_else(|| Numeric::Malformed(s.clone())),
        Some(other) => Numeric::Malformed(other.to_string()),
    }
}

/// Float parsing with `parseFloat` leniency.
pub(crate) fn parse_float(value: Option<&Value>) -> Numeric<f64> {
    match value {
        None => Numeric::Absent,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => Numeric::Parsed(f),
            _ => Numeric::Malformed(n.to_string()),
        },
        Some(Value::String(s)) => float_prefix(s)
            .map(Numeric::Parsed)
            .unwrap_or_else(|| Numeric::Malformed(s.clone())),
        Some(other) => Numeric::Malformed(other.to_string()),
    }
}

/// Leading finite decimal of `s`, if any.
pub(crate) fn float_prefix(s: &str) -> Option<f64> {
    RE_FLOAT_PREFIX
        .captures(s)
        .and_then(|c| c[1].parse::<f64>().ok())
        .filter(|f| f.is_finite())
}

/// Bare hex colors gain a leading `#`; other notations pass through.
pub(crate) fn normalize_color(raw: &str) -> String {
    let trimmed = raw.trim();
    if RE_HEX_COLOR.is_match(trimmed) {
        format!("#{}", trimmed.to_ascii_lowercase())
    } else if let Some(hex) = trimmed.strip_prefix('#') {
        if RE_HEX_COLOR.is_match(hex) {
            format!("#{}", hex.to_ascii_lowercase())
        } else {
            trimmed.to_string()
        }
    } else {
        trimmed.to_string()
    }
}
