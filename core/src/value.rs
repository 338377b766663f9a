#![deny(missing_docs)]

//! # Resolved Values
//!
//! The value model every serializer works on, plus the coercions that turn a
//! value into wire-ready strings and ordered key/value pairs.
//!
//! Values come out of example resolution as `serde_json::Value` and are converted
//! once into [`ResolvedValue`]. The only variant without a JSON counterpart is
//! [`ResolvedValue::File`], produced by the example generator for `format: binary`.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

/// Reference to a file that would be uploaded in place of raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFileRef {
    /// File name shown in form encodings as `@<filename>`.
    pub filename: String,
}

impl BinaryFileRef {
    /// Creates a new file reference.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// The `@filename` marker used by form encodings.
    pub fn marker(&self) -> String {
        format!("@{}", self.filename)
    }
}

/// A parameter or body value after example resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number.
    Number(Number),
    /// A string.
    String(String),
    /// An ordered list.
    List(Vec<ResolvedValue>),
    /// A map that keeps insertion order.
    Map(IndexMap<String, ResolvedValue>),
    /// A binary file marker.
    File(BinaryFileRef),
}

impl ResolvedValue {
    /// Converts back into JSON. File references become an empty object, the same
    /// thing a JSON serializer produces for an opaque file handle.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => JsonValue::Number(n.clone()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, JsonValue>>(),
            ),
            Self::File(_) => JsonValue::Object(Map::new()),
        }
    }

    /// JSON text of the value, as it would sit in a request body literal.
    pub fn to_json_string(&self) -> String {
        // Serializing a `Value` cannot fail: keys are strings and numbers are finite.
        serde_json::to_string(&self.to_json()).unwrap_or_else(|_| "null".to_string())
    }
}

impl From<JsonValue> for ResolvedValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ResolvedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Renders a number the way a JavaScript runtime prints it: integral floats lose
/// their fraction (`30.0` -> `30`).
pub fn format_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            // Beyond 2^53 the integer cast is no longer exact.
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

/// Stringifies a value into one wire string.
///
/// Primitives render as themselves, `null` as `"null"`, files as `@filename`.
/// Lists and maps flatten into a comma-joined sequence (`k1,v1,k2,v2` for maps),
/// recursing into nested containers.
pub fn stringify(value: &ResolvedValue) -> String {
    match value {
        ResolvedValue::Null => "null".to_string(),
        ResolvedValue::Bool(b) => b.to_string(),
        ResolvedValue::Number(n) => format_number(n),
        ResolvedValue::String(s) => s.clone(),
        ResolvedValue::File(file) => file.marker(),
        ResolvedValue::List(_) | ResolvedValue::Map(_) => flatten(value).join(","),
    }
}

/// Flattens a value into its primitive tokens in order.
///
/// Lists contribute their items, maps contribute `key, value` pairs. Used by
/// every non-exploded composite encoding, whatever the separator.
pub fn flatten(value: &ResolvedValue) -> Vec<String> {
    let mut out = Vec::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_into(value: &ResolvedValue, out: &mut Vec<String>) {
    match value {
        ResolvedValue::List(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        ResolvedValue::Map(map) => {
            for (key, item) in map {
                out.push(key.clone());
                flatten_into(item, out);
            }
        }
        other => out.push(stringify(other)),
    }
}

/// Joins list items with `separator` for delimited encodings.
///
/// `null` items render as empty strings (`["a", null, "b"]` -> `a,,b`);
/// nested containers are stringified.
pub fn join_list(items: &[ResolvedValue], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            ResolvedValue::Null => String::new(),
            other => stringify(other),
        })
        .collect::<Vec<_>>()
        .join(separator)
}
