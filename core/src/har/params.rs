#![deny(missing_docs)]

//! # Parameter Serialization
//!
//! Applies OpenAPI `style`/`explode` rules to a resolved parameter value.
//!
//! - **Path**: literal replacement of `{name}`, `{;name}` or `{.name}` in the URL.
//! - **Query**: `form`, `spaceDelimited`, `pipeDelimited`, `deepObject`.
//! - **Header**: always `simple`; explode only changes map encoding.
//! - **Cookie**: always `form`; explode defaults to `true`.
//!
//! Parameters declaring `content` bypass style rules and are serialized as a
//! single media-typed string.

use crate::har::models::SerializedEntry;
use crate::oas::examples::{ExampleGenerator, ExampleOptions};
use crate::oas::models::{ExampleObject, ParameterDefinition, ParameterLocation, ParameterStyle};
use crate::value::{flatten, join_list, stringify, ResolvedValue};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Effective serialization settings of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleAndExplode {
    /// The style, or `None` when the declared style is not recognized.
    /// Unrecognized styles use the location's fallback encoding.
    pub style: Option<ParameterStyle>,
    /// Explode modifier.
    pub explode: bool,
}

/// Output of serializing one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedParameter {
    /// The URL after placeholder replacement.
    Path(String),
    /// Query string entries.
    Query(Vec<SerializedEntry>),
    /// Header entries.
    Header(Vec<SerializedEntry>),
    /// Cookie entries.
    Cookie(Vec<SerializedEntry>),
}

/// Computes the effective style and explode flag for a parameter.
///
/// Header and cookie styles are forced regardless of the declaration.
/// Explode defaults to `true` only for `form`.
pub fn style_and_explode(
    param: &ParameterDefinition,
    location: ParameterLocation,
) -> StyleAndExplode {
    match location {
        ParameterLocation::Header => StyleAndExplode {
            style: Some(ParameterStyle::Simple),
            explode: param.explode.unwrap_or(false),
        },
        ParameterLocation::Cookie => StyleAndExplode {
            style: Some(ParameterStyle::Form),
            explode: param.explode.unwrap_or(true),
        },
        ParameterLocation::Path | ParameterLocation::Query => {
            let style = match param.style.as_deref().filter(|s| !s.is_empty()) {
                Some(raw) => match raw.parse::<ParameterStyle>() {
                    Ok(style) => Some(style),
                    Err(err) => {
                        tracing::debug!("{}; using the fallback encoding", err);
                        None
                    }
                },
                None if location == ParameterLocation::Path => Some(ParameterStyle::Simple),
                None => Some(ParameterStyle::Form),
            };
            let explode = param
                .explode
                .unwrap_or(style == Some(ParameterStyle::Form));
            StyleAndExplode { style, explode }
        }
    }
}

/// Resolves the value a parameter is serialized with.
///
/// Order: named example (`example_key`, else the first one), inline `example`,
/// the content media type's examples, the schema's own `default`/`enum`/
/// `examples`/`example`, then the example generator. Path parameters generate
/// with the `{name}` placeholder as empty string so unresolved placeholders
/// survive.
///
/// Returns `None` when nothing resolves or the chosen example is disabled.
pub fn resolve_parameter_value(
    param: &ParameterDefinition,
    example_key: Option<&str>,
    generator: &dyn ExampleGenerator,
) -> Option<ResolvedValue> {
    let name = param.param_name()?;

    let raw = match pick_example(&param.examples, example_key) {
        Some(example) if example.disabled => {
            tracing::debug!("Parameter '{}' is disabled for this example", name);
            return None;
        }
        Some(ExampleObject {
            value: Some(value), ..
        }) => Some(value.clone()),
        _ => None,
    };

    let raw = raw
        .or_else(|| param.example.clone())
        .or_else(|| content_example(param, example_key))
        .or_else(|| param.schema.as_ref().and_then(schema_literal));

    if let Some(raw) = raw {
        return Some(deserialize_parameter(raw, param));
    }

    let schema = param
        .schema
        .as_ref()
        .or_else(|| param.first_content().and_then(|(_, m)| m.schema.as_ref()))?;
    let options = match param.param_location() {
        Some(ParameterLocation::Path) => {
            ExampleOptions::default().with_empty_string(format!("{{{}}}", name))
        }
        _ => ExampleOptions::default(),
    };
    generator.generate(schema, &options)
}

fn pick_example<'a>(
    examples: &'a IndexMap<String, ExampleObject>,
    key: Option<&str>,
) -> Option<&'a ExampleObject> {
    match key {
        Some(key) => examples.get(key),
        None => examples.values().next(),
    }
}

fn content_example(param: &ParameterDefinition, example_key: Option<&str>) -> Option<JsonValue> {
    let (_, media) = param.first_content()?;
    pick_example(&media.examples, example_key)
        .and_then(|e| e.value.clone())
        .or_else(|| media.example.clone())
}

/// Literal values declared on the schema itself, without synthesis.
fn schema_literal(schema: &JsonValue) -> Option<JsonValue> {
    if let Some(default) = schema.get("default") {
        return Some(default.clone());
    }
    let first = |key: &str| {
        schema
            .get(key)
            .and_then(|v| v.as_array())
            .and_then(|v| v.first())
            .cloned()
    };
    first("enum")
        .or_else(|| first("examples"))
        .or_else(|| schema.get("example").cloned())
}

/// Parses JSON text examples of array and object parameters.
fn deserialize_parameter(raw: JsonValue, param: &ParameterDefinition) -> ResolvedValue {
    if let JsonValue::String(text) = &raw {
        if matches!(param.schema_type(), Some("array") | Some("object")) {
            if let Ok(parsed @ (JsonValue::Array(_) | JsonValue::Object(_))) =
                serde_json::from_str::<JsonValue>(text)
            {
                return ResolvedValue::from(parsed);
            }
        }
    }
    ResolvedValue::from(raw)
}

/// Serializes one parameter.
///
/// `url` is the URL built so far; only path parameters change it. Returns
/// `None` for parameters without a name or with an unknown location, and for
/// encodings that yield nothing (for example `deepObject` without explode).
pub fn serialize_parameter(
    param: &ParameterDefinition,
    value: &ResolvedValue,
    url: &str,
) -> Option<SerializedParameter> {
    let Some(name) = param.param_name() else {
        tracing::debug!("Skipping parameter without a name");
        return None;
    };
    let Some(location) = param.param_location() else {
        tracing::debug!(
            "Skipping parameter '{}' with location {:?}",
            name,
            param.location
        );
        return None;
    };

    if let Some((media_type, _)) = param.first_content() {
        let text = serialize_content_value(value, media_type);
        let entries = vec![SerializedEntry::new(name, text.clone())];
        return Some(match location {
            ParameterLocation::Path => {
                SerializedParameter::Path(url.replace(&format!("{{{}}}", name), &text))
            }
            ParameterLocation::Query => SerializedParameter::Query(entries),
            ParameterLocation::Header => SerializedParameter::Header(entries),
            ParameterLocation::Cookie => SerializedParameter::Cookie(entries),
        });
    }

    let StyleAndExplode { style, explode } = style_and_explode(param, location);

    match location {
        ParameterLocation::Path => Some(SerializedParameter::Path(serialize_path(
            url, name, value, style, explode,
        ))),
        ParameterLocation::Query => {
            let entries = serialize_query(name, value, style, explode);
            if entries.is_empty() && style == Some(ParameterStyle::DeepObject) {
                tracing::debug!(
                    "deepObject parameter '{}' produced no entries (explode={})",
                    name,
                    explode
                );
            }
            Some(SerializedParameter::Query(entries))
        }
        ParameterLocation::Header => Some(SerializedParameter::Header(vec![
            SerializedEntry::new(name, serialize_simple(value, explode)),
        ])),
        ParameterLocation::Cookie => Some(SerializedParameter::Cookie(serialize_cookie(
            name, value, explode,
        ))),
    }
}

/// Serializes a `content` parameter value. Strings pass through unchanged,
/// JSON media types stringify, other media types comma-join lists.
pub fn serialize_content_value(value: &ResolvedValue, media_type: &str) -> String {
    match value {
        ResolvedValue::String(s) => s.clone(),
        ResolvedValue::List(items) if !media_type.contains("json") => join_list(items, ","),
        ResolvedValue::List(_) | ResolvedValue::Map(_) | ResolvedValue::Null => {
            value.to_json_string()
        }
        other => stringify(other),
    }
}

/// `key=value` pairs of a map joined by `separator`.
fn key_equals_value(map: &IndexMap<String, ResolvedValue>, separator: &str) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, stringify(v)))
        .collect::<Vec<_>>()
        .join(separator)
}

/// `simple` style: lists always comma-join, maps use `k=v` when exploded.
pub fn serialize_simple(value: &ResolvedValue, explode: bool) -> String {
    match value {
        ResolvedValue::List(items) => join_list(items, ","),
        ResolvedValue::Map(map) if explode => key_equals_value(map, ","),
        ResolvedValue::Map(_) => flatten(value).join(","),
        other => stringify(other),
    }
}

fn serialize_path(
    url: &str,
    name: &str,
    value: &ResolvedValue,
    style: Option<ParameterStyle>,
    explode: bool,
) -> String {
    match style {
        Some(ParameterStyle::Matrix) => {
            let encoded = match (value, explode) {
                (ResolvedValue::List(items), true) => items
                    .iter()
                    .map(|v| format!(";{}={}", name, stringify(v)))
                    .collect::<String>(),
                (ResolvedValue::Map(map), true) => format!(";{}", key_equals_value(map, ";")),
                (ResolvedValue::List(items), false) => {
                    format!(";{}={}", name, join_list(items, ","))
                }
                (ResolvedValue::Map(_), false) => format!(";{}={}", name, flatten(value).join(",")),
                (other, _) => format!(";{}={}", name, stringify(other)),
            };
            url.replace(&format!("{{;{}}}", name), &encoded)
        }
        Some(ParameterStyle::Label) => {
            let encoded = match (value, explode) {
                (ResolvedValue::List(items), true) => format!(".{}", join_list(items, ".")),
                (ResolvedValue::Map(map), true) => format!(".{}", key_equals_value(map, ".")),
                (ResolvedValue::List(items), false) => format!(".{}", join_list(items, ",")),
                (ResolvedValue::Map(_), false) => format!(".{}", flatten(value).join(",")),
                (other, _) => format!(".{}", stringify(other)),
            };
            url.replace(&format!("{{.{}}}", name), &encoded)
        }
        Some(ParameterStyle::Simple) => {
            url.replace(&format!("{{{}}}", name), &serialize_simple(value, explode))
        }
        _ => url.replace(&format!("{{{}}}", name), &stringify(value)),
    }
}

fn serialize_query(
    name: &str,
    value: &ResolvedValue,
    style: Option<ParameterStyle>,
    explode: bool,
) -> Vec<SerializedEntry> {
    match style {
        Some(ParameterStyle::Form) => match (value, explode) {
            (ResolvedValue::List(items), true) => items
                .iter()
                .map(|item| SerializedEntry::new(name, stringify(item)))
                .collect(),
            (ResolvedValue::Map(map), true) => map
                .iter()
                .map(|(k, v)| SerializedEntry::new(k.as_str(), stringify(v)))
                .collect(),
            (ResolvedValue::List(items), false) => {
                vec![SerializedEntry::new(name, join_list(items, ","))]
            }
            (ResolvedValue::Map(_), false) => {
                vec![SerializedEntry::new(name, flatten(value).join(","))]
            }
            (other, _) => vec![SerializedEntry::new(name, stringify(other))],
        },
        Some(ParameterStyle::SpaceDelimited) => {
            vec![SerializedEntry::new(name, delimited(value, " "))]
        }
        Some(ParameterStyle::PipeDelimited) => {
            vec![SerializedEntry::new(name, delimited(value, "|"))]
        }
        Some(ParameterStyle::DeepObject) => match value {
            ResolvedValue::Map(map) if explode => {
                let mut entries = Vec::new();
                deep_object_entries(name, map, &mut entries);
                entries
            }
            _ => Vec::new(),
        },
        _ => vec![SerializedEntry::new(name, stringify(value))],
    }
}

fn delimited(value: &ResolvedValue, separator: &str) -> String {
    match value {
        ResolvedValue::List(items) => join_list(items, separator),
        ResolvedValue::Map(_) => flatten(value).join(separator),
        other => stringify(other),
    }
}

/// Nested maps extend the bracket path: `user[name][first]`.
fn deep_object_entries(
    prefix: &str,
    map: &IndexMap<String, ResolvedValue>,
    out: &mut Vec<SerializedEntry>,
) {
    for (key, value) in map {
        let name = format!("{}[{}]", prefix, key);
        match value {
            ResolvedValue::Map(nested) => deep_object_entries(&name, nested, out),
            other => out.push(SerializedEntry::new(name, stringify(other))),
        }
    }
}

/// Cookies keep `null` as the string `"null"`, also inside joined lists.
///
/// An exploded list yields several cookies with the same name.
fn serialize_cookie(name: &str, value: &ResolvedValue, explode: bool) -> Vec<SerializedEntry> {
    match (value, explode) {
        (ResolvedValue::List(items), true) => items
            .iter()
            .map(|item| SerializedEntry::new(name, stringify(item)))
            .collect(),
        (ResolvedValue::Map(map), true) => map
            .iter()
            .map(|(k, v)| SerializedEntry::new(k.as_str(), stringify(v)))
            .collect(),
        (other, _) => vec![SerializedEntry::new(name, stringify(other))],
    }
}
