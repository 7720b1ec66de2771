//! URL value codecs
//!
//! Each parser is a pure pair of `parse` and `serialize` plus an equality
//! check used to decide whether the URL needs to change. Parsing never
//! fails loudly; malformed input is `None` and the caller falls back.

use chrono::{DateTime, Utc};

use crate::utils::time::parse_timestamp;

/// Separator for multi-value params (`status=todo,done`)
pub const ARRAY_DELIMITER: char = ',';

/// Separator for two-bound ranges (`estimatedHours=2~8`)
pub const RANGE_DELIMITER: char = '~';

/// Bidirectional codec between a URL parameter string and a typed value
pub trait QueryParser {
    type Value: Clone + PartialEq;

    fn parse(&self, raw: &str) -> Option<Self::Value>;

    fn serialize(&self, value: &Self::Value) -> String;

    fn eq(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a == b
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl QueryParser for StringParser {
    type Value = String;

    fn parse(&self, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn serialize(&self, value: &String) -> String {
        value.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerParser;

impl QueryParser for IntegerParser {
    type Value = i64;

    fn parse(&self, raw: &str) -> Option<i64> {
        raw.trim().parse().ok()
    }

    fn serialize(&self, value: &i64) -> String {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParser;

impl QueryParser for FloatParser {
    type Value = f64;

    fn parse(&self, raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn serialize(&self, value: &f64) -> String {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParser;

impl QueryParser for BooleanParser {
    type Value = bool;

    fn parse(&self, raw: &str) -> Option<bool> {
        match raw {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn serialize(&self, value: &bool) -> String {
        value.to_string()
    }
}

/// Timestamps as epoch millis; RFC 3339 is accepted on input
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampParser;

impl QueryParser for TimestampParser {
    type Value = DateTime<Utc>;

    fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        parse_timestamp(raw)
    }

    fn serialize(&self, value: &DateTime<Utc>) -> String {
        value.timestamp_millis().to_string()
    }
}

/// Delimited list of values; unparseable items are dropped
#[derive(Debug, Clone, Copy)]
pub struct ArrayParser<P> {
    inner: P,
    delimiter: char,
}

impl<P: QueryParser> ArrayParser<P> {
    pub fn new(inner: P) -> Self {
        Self::with_delimiter(inner, ARRAY_DELIMITER)
    }

    pub fn with_delimiter(inner: P, delimiter: char) -> Self {
        Self { inner, delimiter }
    }
}

impl<P: QueryParser> QueryParser for ArrayParser<P> {
    type Value = Vec<P::Value>;

    fn parse(&self, raw: &str) -> Option<Self::Value> {
        let items: Vec<_> = raw
            .split(self.delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| self.inner.parse(s))
            .collect();
        (!items.is_empty()).then_some(items)
    }

    fn serialize(&self, value: &Self::Value) -> String {
        value
            .iter()
            .map(|v| self.inner.serialize(v))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }

    fn eq(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.inner.eq(x, y))
    }
}

/// Two optional bounds separated by the range delimiter (`2~`, `~8`, `2~8`)
///
/// A range open on both ends serializes to the empty string and parses as `None`.
#[derive(Debug, Clone, Copy)]
pub struct RangeParser<P> {
    inner: P,
    delimiter: char,
}

impl<P: QueryParser> RangeParser<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            delimiter: RANGE_DELIMITER,
        }
    }
}

impl<P: QueryParser> QueryParser for RangeParser<P> {
    type Value = (Option<P::Value>, Option<P::Value>);

    fn parse(&self, raw: &str) -> Option<Self::Value> {
        let (lo, hi) = raw.split_once(self.delimiter)?;
        if hi.contains(self.delimiter) {
            return None;
        }
        let bound = |s: &str| -> Option<Option<P::Value>> {
            let s = s.trim();
            if s.is_empty() {
                Some(None)
            } else {
                self.inner.parse(s).map(Some)
            }
        };
        match (bound(lo)?, bound(hi)?) {
            (None, None) => None,
            range => Some(range),
        }
    }

    fn serialize(&self, value: &Self::Value) -> String {
        match value {
            (None, None) => String::new(),
            (lo, hi) => {
                let side = |v: &Option<P::Value>| {
                    v.as_ref().map(|v| self.inner.serialize(v)).unwrap_or_default()
                };
                format!("{}{}{}", side(lo), self.delimiter, side(hi))
            }
        }
    }
}

/// Substitutes a default for missing or malformed input
///
/// The default serializes to the empty string so the parameter can be dropped.
#[derive(Clone)]
pub struct WithDefault<P: QueryParser> {
    inner: P,
    default: P::Value,
}

impl<P: QueryParser> WithDefault<P> {
    pub fn new(inner: P, default: P::Value) -> Self {
        Self { inner, default }
    }

    pub fn default_value(&self) -> &P::Value {
        &self.default
    }

    /// Parse an optional raw parameter, falling back to the default
    pub fn parse_or_default(&self, raw: Option<&str>) -> P::Value {
        raw.and_then(|r| self.inner.parse(r))
            .unwrap_or_else(|| self.default.clone())
    }

    /// Whether `value` differs from the default and belongs in the URL
    pub fn should_serialize(&self, value: &P::Value) -> bool {
        !self.inner.eq(value, &self.default)
    }
}

impl<P: QueryParser> QueryParser for WithDefault<P> {
    type Value = P::Value;

    fn parse(&self, raw: &str) -> Option<P::Value> {
        Some(self.parse_or_default(Some(raw)))
    }

    fn serialize(&self, value: &P::Value) -> String {
        if self.should_serialize(value) {
            self.inner.serialize(value)
        } else {
            String::new()
        }
    }

    fn eq(&self, a: &P::Value, b: &P::Value) -> bool {
        self.inner.eq(a, b)
    }
}
