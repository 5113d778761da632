//! Request payload buffer.
//!
//! A [`Payload`] is the nested JSON input one in-flight request owns for the
//! duration of its validation lifecycle. Hooks mutate it in place; projection
//! reads it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested request input: a JSON object of scalars, sequences, and mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a payload from an arbitrary JSON value.
    ///
    /// Only objects carry request fields; any other value degrades to the
    /// empty payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                if !other.is_null() {
                    tracing::debug!(kind = value_kind(&other), "Discarding non-object payload");
                }
                Self::new()
            }
        }
    }

    /// Looks up a value by dotted path, e.g. `"nested.foo"` or `"items.0"`.
    ///
    /// Dots descend into mappings by key and into sequences by numeric index.
    /// Returns `None` if any segment fails to resolve.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Inserts or overwrites a top-level field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Swaps the entire payload for new contents. This is the mutation
    /// operation exposed to prepare/post hooks.
    pub fn replace(&mut self, contents: Map<String, Value>) {
        self.0 = contents;
    }

    /// Whether the payload holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrows the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload, returning the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Consumes the payload, returning it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
