#![deny(missing_docs)]

//! # Schema Example Generation
//!
//! Synthesizes a representative value from a JSON Schema when an operation
//! provides no explicit example.
//!
//! Handles:
//! - Explicit values on the schema (`examples[0]`, `example`, `default`, `const`, `enum[0]`).
//! - Objects (properties in declaration order, pattern and additional properties).
//! - Arrays (single representative item).
//! - Composition (`oneOf`/`anyOf` pick the first usable branch, `allOf` merges).
//! - `readOnly`/`writeOnly` filtering by mode, `x-variable` substitution.
//! - Local `$ref` resolution with cycle and depth guards.

use crate::oas::ref_utils::{ref_target, resolve_chain, resolve_pointer};
use crate::value::{BinaryFileRef, ResolvedValue};
use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};

/// Maximum recursion depth before a placeholder is emitted.
const MAX_LEVELS_DEEP: usize = 10;

/// Properties emitted per object once nesting goes past level 3.
const MAX_PROPERTIES: usize = 10;

/// Key used for `additionalProperties` when no custom name is declared.
const DEFAULT_ADDITIONAL_PROPERTIES_NAME: &str = "propertyName*";

/// Which side of the exchange the example is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleMode {
    /// Response side: `writeOnly` properties are omitted.
    Read,
    /// Request side: `readOnly` properties are omitted.
    Write,
}

/// Options for a single generation call.
#[derive(Debug, Clone, Default)]
pub struct ExampleOptions {
    /// Read/write filtering; `None` keeps every property.
    pub mode: Option<ExampleMode>,
    /// Use `xml.name` for property keys and wrap the root element.
    pub xml: bool,
    /// Replacement for empty strings. Also enables format-based sample strings.
    pub empty_string: Option<String>,
    /// Values looked up by the `x-variable` extension.
    pub variables: IndexMap<String, JsonValue>,
}

impl ExampleOptions {
    /// Options for request bodies.
    pub fn write() -> Self {
        Self {
            mode: Some(ExampleMode::Write),
            ..Default::default()
        }
    }

    /// Sets the empty-string replacement.
    pub fn with_empty_string(mut self, value: impl Into<String>) -> Self {
        self.empty_string = Some(value.into());
        self
    }
}

/// Source of synthesized values for schemas without usable examples.
pub trait ExampleGenerator {
    /// Generates a value for `schema`. `None` means the schema yields nothing
    /// (omitted by mode, deprecated, or unresolvable).
    fn generate(&self, schema: &JsonValue, options: &ExampleOptions) -> Option<ResolvedValue>;
}

/// The standard generator, optionally bound to a document for `$ref` resolution.
#[derive(Debug, Clone, Default)]
pub struct SchemaExampleGenerator {
    document: Option<JsonValue>,
}

impl SchemaExampleGenerator {
    /// A generator that cannot resolve references.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator resolving `#/...` references against `document`.
    pub fn with_document(document: JsonValue) -> Self {
        Self {
            document: Some(document),
        }
    }

    fn deref<'a>(&'a self, schema: &'a JsonValue) -> Option<&'a JsonValue> {
        match (&self.document, ref_target(schema)) {
            (_, None) => Some(schema),
            (Some(root), Some(_)) => resolve_chain(root, schema),
            (None, Some(_)) => None,
        }
    }

    fn example(
        &self,
        schema: &JsonValue,
        options: &ExampleOptions,
        level: usize,
        seen: &mut Vec<String>,
    ) -> Option<ResolvedValue> {
        if let Some(target) = ref_target(schema) {
            if seen.iter().any(|s| s == target) {
                return Some(ResolvedValue::from("[Circular Reference]"));
            }
            let resolved = self
                .document
                .as_ref()
                .and_then(|root| resolve_pointer(root, target))?;
            seen.push(target.to_string());
            let result = self.example(resolved, options, level, seen);
            seen.pop();
            return result;
        }

        let obj = schema.as_object()?;

        if level > MAX_LEVELS_DEEP {
            return Some(ResolvedValue::from("[Max Depth Exceeded]"));
        }

        let flag = |key: &str| obj.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
        if flag("deprecated")
            || (options.mode == Some(ExampleMode::Write) && flag("readOnly"))
            || (options.mode == Some(ExampleMode::Read) && flag("writeOnly"))
        {
            return None;
        }

        let schema_type = obj.get("type").and_then(|t| t.as_str());

        if let Some(name) = obj.get("x-variable").and_then(|v| v.as_str()) {
            if let Some(value) = options.variables.get(name) {
                if matches!(schema_type, Some("number") | Some("integer")) {
                    return Some(coerce_number(value));
                }
                return Some(ResolvedValue::from(value.clone()));
            }
        }

        if let Some(first) = obj
            .get("examples")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
        {
            return Some(ResolvedValue::from(first.clone()));
        }
        for key in ["example", "default", "const"] {
            if let Some(value) = obj.get(key) {
                return Some(ResolvedValue::from(value.clone()));
            }
        }
        if let Some(first) = obj
            .get("enum")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
        {
            return Some(ResolvedValue::from(first.clone()));
        }

        if obj.contains_key("properties") || schema_type == Some("object") {
            return Some(self.object_example(schema, options, level, seen));
        }

        if schema_type == Some("array") || obj.contains_key("items") {
            return Some(self.array_example(schema, options, level, seen));
        }

        if let Some(t) = schema_type {
            if let Some(primitive) = primitive_example(t, schema, options) {
                return Some(primitive);
            }
        }

        for union_key in ["oneOf", "anyOf"] {
            if let Some(branches) = obj.get(union_key).and_then(|b| b.as_array()) {
                if branches.is_empty() {
                    continue;
                }
                for branch in branches {
                    let Some(resolved) = self.deref(branch) else {
                        continue;
                    };
                    if resolved.get("type").and_then(|t| t.as_str()) != Some("null") {
                        return self
                            .example(branch, options, level + 1, seen)
                            .or(Some(ResolvedValue::Null));
                    }
                }
                return Some(ResolvedValue::Null);
            }
        }

        if let Some(parts) = obj.get("allOf").and_then(|a| a.as_array()) {
            if !parts.is_empty() {
                let mut merged: Option<ResolvedValue> = None;
                for part in parts {
                    let Some(ex) = self.example(part, options, level + 1, seen) else {
                        continue;
                    };
                    merged = Some(match merged {
                        None => ex,
                        Some(base) => merge_examples(base, ex),
                    });
                }
                return Some(merged.unwrap_or(ResolvedValue::Null));
            }
        }

        if let Some(types) = obj.get("type").and_then(|t| t.as_array()) {
            if types.iter().any(|t| t.as_str() == Some("null")) {
                return Some(ResolvedValue::Null);
            }
            if let Some(first) = types.first().and_then(|t| t.as_str()) {
                if let Some(primitive) = primitive_example(first, schema, options) {
                    return Some(primitive);
                }
            }
        }

        Some(ResolvedValue::Null)
    }

    fn object_example(
        &self,
        schema: &JsonValue,
        options: &ExampleOptions,
        level: usize,
        seen: &mut Vec<String>,
    ) -> ResolvedValue {
        let mut response: IndexMap<String, ResolvedValue> = IndexMap::new();

        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            let limit = if level > 3 {
                MAX_PROPERTIES.min(properties.len())
            } else {
                properties.len()
            };

            for (name, property) in properties.iter().take(limit) {
                let Some(resolved) = self.deref(property) else {
                    continue;
                };
                let xml_name = if options.xml {
                    xml_name(resolved)
                } else {
                    None
                };
                if let Some(value) = self.example(property, options, level + 1, seen) {
                    response.insert(xml_name.unwrap_or(name).to_string(), value);
                }
            }

            if level > 3 && properties.len() > MAX_PROPERTIES {
                response.insert(
                    "...".to_string(),
                    ResolvedValue::from("[Additional Properties Truncated]"),
                );
            }
        }

        if let Some(patterns) = schema.get("patternProperties").and_then(|p| p.as_object()) {
            for (pattern, property) in patterns {
                if let Some(value) = self.example(property, options, level + 1, seen) {
                    response.insert(pattern.clone(), value);
                }
            }
        }

        match schema.get("additionalProperties") {
            Some(JsonValue::Bool(true)) => {
                response.insert(
                    DEFAULT_ADDITIONAL_PROPERTIES_NAME.to_string(),
                    ResolvedValue::from("anything"),
                );
            }
            Some(additional @ JsonValue::Object(_)) => {
                let resolved = self.deref(additional);
                let name = resolved
                    .and_then(|a| a.get("x-additionalPropertiesName"))
                    .and_then(|n| n.as_str())
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(|n| format!("{}*", n))
                    .unwrap_or_else(|| DEFAULT_ADDITIONAL_PROPERTIES_NAME.to_string());
                let is_any_type = additional.as_object().is_some_and(|o| o.is_empty());
                let value = if is_any_type {
                    Some(ResolvedValue::from("anything"))
                } else {
                    self.example(additional, options, level + 1, seen)
                };
                if let Some(value) = value {
                    response.insert(name, value);
                }
            }
            _ => {}
        }

        let first_branch = |key: &str| {
            schema
                .get(key)
                .and_then(|b| b.as_array())
                .and_then(|b| b.first())
        };
        if let Some(branch) = first_branch("oneOf").or_else(|| first_branch("anyOf")) {
            if let Some(ResolvedValue::Map(extra)) = self.example(branch, options, level + 1, seen)
            {
                response.extend(extra);
            }
        } else if let Some(parts) = schema.get("allOf").and_then(|a| a.as_array()) {
            let mut merged = ResolvedValue::Map(std::mem::take(&mut response));
            for part in parts {
                if let Some(ex) = self.example(part, options, level + 1, seen) {
                    merged = merge_examples(merged, ex);
                }
            }
            if let ResolvedValue::Map(map) = merged {
                response = map;
            }
        }

        if options.xml && level == 0 {
            if let Some(root_name) = xml_name(schema) {
                let mut wrapped = IndexMap::new();
                wrapped.insert(root_name.to_string(), ResolvedValue::Map(response));
                return ResolvedValue::Map(wrapped);
            }
        }

        ResolvedValue::Map(response)
    }

    fn array_example(
        &self,
        schema: &JsonValue,
        options: &ExampleOptions,
        level: usize,
        seen: &mut Vec<String>,
    ) -> ResolvedValue {
        let raw_items = schema.get("items");
        let items = raw_items.and_then(|i| self.deref(i));
        let item_tag = items.and_then(xml_name).map(str::to_string);
        let wrapped = schema
            .get("xml")
            .and_then(|x| x.get("wrapped"))
            .and_then(|w| w.as_bool())
            .unwrap_or(false);
        let wrap_tag = if options.xml && wrapped { item_tag } else { None };
        let wrap = |value: ResolvedValue| match &wrap_tag {
            Some(tag) => {
                let mut map = IndexMap::new();
                map.insert(tag.clone(), value);
                ResolvedValue::Map(map)
            }
            None => value,
        };

        let (Some(raw_items), Some(items)) = (raw_items, items) else {
            return ResolvedValue::List(Vec::new());
        };
        if !items.is_object() {
            return ResolvedValue::List(Vec::new());
        }

        if let Some(parts) = items.get("allOf").and_then(|a| a.as_array()) {
            if let Some(first) = parts.first() {
                let first_is_object = self
                    .deref(first)
                    .and_then(|f| f.get("type"))
                    .and_then(|t| t.as_str())
                    == Some("object");
                if first_is_object {
                    let combined = serde_json::json!({ "type": "object", "allOf": parts });
                    let merged = self
                        .example(&combined, options, level + 1, seen)
                        .unwrap_or(ResolvedValue::Null);
                    return ResolvedValue::List(vec![wrap(merged)]);
                }
                let examples = parts
                    .iter()
                    .filter_map(|part| self.example(part, options, level + 1, seen))
                    .map(wrap)
                    .collect();
                return ResolvedValue::List(examples);
            }
        }

        let union = items
            .get("anyOf")
            .or_else(|| items.get("oneOf"))
            .and_then(|u| u.as_array())
            .and_then(|u| u.first());
        if let Some(first) = union {
            let ex = self
                .example(first, options, level + 1, seen)
                .unwrap_or(ResolvedValue::Null);
            return ResolvedValue::List(vec![wrap(ex)]);
        }

        let has_shape = items.get("type").is_some()
            || items.get("properties").is_some()
            || items.get("items").is_some();
        if has_shape {
            let ex = self
                .example(raw_items, options, level + 1, seen)
                .unwrap_or(ResolvedValue::Null);
            return ResolvedValue::List(vec![wrap(ex)]);
        }

        ResolvedValue::List(Vec::new())
    }
}

impl ExampleGenerator for SchemaExampleGenerator {
    fn generate(&self, schema: &JsonValue, options: &ExampleOptions) -> Option<ResolvedValue> {
        self.example(schema, options, 0, &mut Vec::new())
    }
}

fn xml_name(schema: &JsonValue) -> Option<&str> {
    schema
        .get("xml")
        .and_then(|x| x.get("name"))
        .and_then(|n| n.as_str())
}

/// Arrays concatenate, maps merge (right wins), anything else is replaced.
fn merge_examples(base: ResolvedValue, next: ResolvedValue) -> ResolvedValue {
    match (base, next) {
        (ResolvedValue::List(mut a), ResolvedValue::List(b)) => {
            a.extend(b);
            ResolvedValue::List(a)
        }
        (ResolvedValue::Map(mut a), ResolvedValue::Map(b)) => {
            a.extend(b);
            ResolvedValue::Map(a)
        }
        (_, next) => next,
    }
}

fn coerce_number(value: &JsonValue) -> ResolvedValue {
    let parsed = match value {
        JsonValue::Number(n) => Some(n.clone()),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Number::from)
                .or_else(|_| s.parse::<u64>().map(Number::from))
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64))
        }
        JsonValue::Bool(b) => Some(Number::from(u8::from(*b))),
        _ => None,
    };
    parsed.map(ResolvedValue::Number).unwrap_or(ResolvedValue::Null)
}

fn primitive_example(
    schema_type: &str,
    schema: &JsonValue,
    options: &ExampleOptions,
) -> Option<ResolvedValue> {
    let minimum = || {
        schema
            .get("minimum")
            .and_then(|m| m.as_number())
            .cloned()
            .unwrap_or_else(|| Number::from(1))
    };
    match schema_type {
        "string" => Some(string_example(schema, options)),
        "boolean" => Some(ResolvedValue::Bool(true)),
        "integer" | "number" => Some(ResolvedValue::Number(minimum())),
        "array" => Some(ResolvedValue::List(Vec::new())),
        "null" => Some(ResolvedValue::Null),
        _ => None,
    }
}

fn string_example(schema: &JsonValue, options: &ExampleOptions) -> ResolvedValue {
    let format = schema.get("format").and_then(|f| f.as_str());
    if format == Some("binary") {
        return ResolvedValue::File(BinaryFileRef::new("filename"));
    }
    let fallback = options.empty_string.clone().unwrap_or_default();
    if options.empty_string.is_some() {
        if let Some(sample) = format.and_then(format_sample) {
            return ResolvedValue::from(sample);
        }
    }
    ResolvedValue::String(fallback)
}

/// Sample strings for well-known formats. Dates are fixed so repeated
/// generation stays byte-identical.
fn format_sample(format: &str) -> Option<&'static str> {
    let sample = match format {
        "date-time" => "2024-01-01T00:00:00.000Z",
        "date" => "2024-01-01",
        "time" => "00:00:00",
        "email" => "hello@example.com",
        "hostname" => "example.com",
        "idn-email" => "jane.doe@example.com",
        "idn-hostname" => "example.com",
        "ipv4" => "127.0.0.1",
        "ipv6" => "51d4:7fab:bfbf:b7d7:b2cb:d4b4:3dad:d998",
        "iri-reference" => "/entitiy/1",
        "iri" => "https://example.com/entity/123",
        "json-pointer" => "/nested/objects",
        "password" => "super-secret",
        "regex" => "/[a-z]/",
        "relative-json-pointer" => "1/nested/objects",
        "uri-reference" => "../folder",
        "uri-template" => "https://example.com/{id}",
        "uri" => "https://example.com",
        "uuid" => "123e4567-e89b-12d3-a456-426614174000",
        "object-id" => "6592008029c8c3e4dc76256c",
        _ => return None,
    };
    Some(sample)
}
