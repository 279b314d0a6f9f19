//! condition parser - field paths and the serde encodings of conditions
//!
//! a condition is written either in structured form:
//! - `{ "or": [..] }`, `{ "and": [..] }`, `{ "not": .. }`
//! - `{ "field": "a.[+].b", "op": "=", "value": 1 }`
//!
//! or, for leaves only, as a 3-element shorthand: `["a.[+].b", "=", 1]`

use log::trace;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::MatchError;
use super::types::{Condition, Expression, PathStep};

/// parse a dotted field path into steps
///
/// segments are trimmed; `[*]`, `[+]` and `[<int>]` become array steps and
/// any other bracketed segment is dropped. everything else is an object key,
/// including the empty string.
pub fn parse_field_path(path: &str) -> Vec<PathStep> {
    path.split('.').filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<PathStep> {
    let segment = segment.trim();
    match bracketed(segment) {
        Some("*") => Some(PathStep::All),
        Some("+") => Some(PathStep::Any),
        Some(inner) => inner.parse::<i64>().ok().map(PathStep::At),
        None => Some(PathStep::Key(segment.to_string())),
    }
}

fn bracketed(segment: &str) -> Option<&str> {
    segment.strip_prefix('[')?.strip_suffix(']')
}

/// bracketed segments of a path that produce no step
pub(crate) fn dropped_segments(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| bracketed(segment).is_some() && parse_segment(segment).is_none())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Decoding
// ============================================================================

/// the authored object form: four optional parts, resolved by priority
#[derive(Deserialize)]
struct StructuredCondition {
    #[serde(default)]
    or: Option<Vec<Condition>>,
    #[serde(default)]
    and: Option<Vec<Condition>>,
    #[serde(default)]
    not: Option<Box<Condition>>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    op: Option<String>,
    #[serde(default)]
    value: Value,
}

impl StructuredCondition {
    fn into_condition(self) -> Condition {
        if let Some(children) = self.or.filter(|c| !c.is_empty()) {
            return Condition::Or(children);
        }
        if let Some(children) = self.and.filter(|c| !c.is_empty()) {
            return Condition::And(children);
        }
        if let Some(inner) = self.not {
            return Condition::Not(inner);
        }
        Condition::Expr(Expression::new(
            self.field.unwrap_or_default(),
            self.op.unwrap_or_default(),
            self.value,
        ))
    }
}

impl Condition {
    /// decode a condition from a JSON string
    pub fn from_json(s: &str) -> Result<Self, MatchError> {
        let raw: Value =
            serde_json::from_str(s).map_err(|e| MatchError::Decode(e.to_string()))?;
        Self::from_value(raw)
    }

    /// decode a condition from an already-parsed value
    ///
    /// arrays are read as the shorthand leaf form, anything else as the
    /// structured form.
    pub fn from_value(raw: Value) -> Result<Self, MatchError> {
        match raw {
            Value::Array(items) => decode_shorthand(items),
            other => StructuredCondition::deserialize(other)
                .map(StructuredCondition::into_condition)
                .map_err(|e| MatchError::Decode(e.to_string())),
        }
    }
}

fn decode_shorthand(items: Vec<Value>) -> Result<Condition, MatchError> {
    if items.len() != 3 {
        return Err(MatchError::Decode(format!(
            "shorthand expression should have length 3, but got {}",
            items.len()
        )));
    }

    let mut items = items.into_iter();
    let field = shorthand_string(items.next(), "field")?;
    let op = shorthand_string(items.next(), "operator")?;
    let value = items.next().unwrap_or(Value::Null);

    trace!("decoded shorthand expression [{:?}, {:?}, {}]", field, op, value);
    Ok(Condition::Expr(Expression::new(field, op, value)))
}

fn shorthand_string(item: Option<Value>, what: &str) -> Result<String, MatchError> {
    match item {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(MatchError::Decode(format!(
            "shorthand expression {} should be a string, but got {}",
            what, other
        ))),
        None => Err(MatchError::Decode(format!(
            "shorthand expression is missing its {}",
            what
        ))),
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Condition::from_value(raw).map_err(|e| match e {
            MatchError::Decode(msg) => de::Error::custom(msg),
            other => de::Error::custom(other),
        })
    }
}

// ============================================================================
// Encoding
// ============================================================================

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.field().is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.field().is_empty() {
            map.serialize_entry("field", self.field())?;
        }
        map.serialize_entry("op", self.op())?;
        map.serialize_entry("value", self.value())?;
        map.end()
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Condition::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", children)?;
                map.end()
            }
            Condition::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", children)?;
                map.end()
            }
            Condition::Not(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("not", inner)?;
                map.end()
            }
            Condition::Expr(expr) => expr.serialize(serializer),
        }
    }
}
