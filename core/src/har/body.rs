#![deny(missing_docs)]

//! # Body Encoding
//!
//! Resolves the example of a request body and encodes it for the chosen media type.
//!
//! Value priority: explicit example, named example, inline `example`, then a value
//! generated from the schema in write mode.
//!
//! Encodings:
//! - `multipart/form-data`, `application/x-www-form-urlencoded`: flattened fields.
//! - `application/xml` (and `+xml`): XML text for map values.
//! - Anything else: JSON text.

use crate::har::models::{PostData, SerializedEntry};
use crate::har::xml::map_to_xml;
use crate::oas::examples::{ExampleGenerator, ExampleOptions};
use crate::oas::models::{MediaTypeObject, RequestBodyDefinition};
use crate::value::{stringify, ResolvedValue};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// The result of encoding a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedBody {
    /// A text body (JSON, XML).
    Text {
        /// Media type.
        mime_type: String,
        /// Body text.
        text: String,
    },
    /// A form body.
    Params {
        /// Media type.
        mime_type: String,
        /// Flattened form fields.
        params: Vec<SerializedEntry>,
    },
    /// Nothing to send.
    NoBody,
}

impl EncodedBody {
    /// The media type, unless there is no body.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Text { mime_type, .. } | Self::Params { mime_type, .. } => Some(mime_type),
            Self::NoBody => None,
        }
    }

    /// Converts into the output body; `NoBody` yields `None`.
    pub fn into_post_data(self) -> Option<PostData> {
        match self {
            Self::Text { mime_type, text } => Some(PostData {
                mime_type,
                text: Some(text),
                params: None,
            }),
            Self::Params { mime_type, params } => Some(PostData {
                mime_type,
                text: None,
                params: Some(params),
            }),
            Self::NoBody => None,
        }
    }

    /// Converts into the legacy shape, where an absent body is
    /// `{mimeType: "", text: "null"}`.
    pub fn into_legacy(self) -> PostData {
        self.into_post_data().unwrap_or_else(|| PostData {
            mime_type: String::new(),
            text: Some("null".to_string()),
            params: None,
        })
    }
}

/// True for media types encoded as form fields.
pub fn is_form_media_type(media_type: &str) -> bool {
    let essence = essence(media_type);
    essence == "multipart/form-data" || essence == "application/x-www-form-urlencoded"
}

/// True for XML media types.
pub fn is_xml_media_type(media_type: &str) -> bool {
    let essence = essence(media_type);
    essence.ends_with("/xml") || essence.ends_with("+xml")
}

/// Media type without parameters, lowercased.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Encodes a request body.
///
/// `content_type` selects the media type (first declared when `None`).
/// `explicit_example` always wins; `example_key` selects a named example.
pub fn encode_body(
    body: Option<&RequestBodyDefinition>,
    content_type: Option<&str>,
    explicit_example: Option<&JsonValue>,
    example_key: Option<&str>,
    generator: &dyn ExampleGenerator,
) -> EncodedBody {
    let mime_type = content_type
        .map(str::to_string)
        .or_else(|| body.and_then(|b| b.first_media_type()).map(str::to_string));
    let Some(mime_type) = mime_type else {
        tracing::debug!("No media type available for the request body");
        return EncodedBody::NoBody;
    };

    let media = body.and_then(|b| find_media_type(&b.content_by_media_type, &mime_type));

    let value = match explicit_example {
        Some(example) => Some(ResolvedValue::from(example.clone())),
        None => media.and_then(|m| resolve_media_example(m, &mime_type, example_key, generator)),
    };
    let Some(value) = value else {
        tracing::debug!("No example resolvable for body media type '{}'", mime_type);
        return EncodedBody::NoBody;
    };

    encode_value(mime_type, value)
}

fn find_media_type<'a>(
    content: &'a IndexMap<String, MediaTypeObject>,
    mime_type: &str,
) -> Option<&'a MediaTypeObject> {
    content.get(mime_type).or_else(|| {
        content
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(mime_type))
            .map(|(_, media)| media)
    })
}

fn resolve_media_example(
    media: &MediaTypeObject,
    mime_type: &str,
    example_key: Option<&str>,
    generator: &dyn ExampleGenerator,
) -> Option<ResolvedValue> {
    let named = match example_key {
        Some(key) => media.named_example(key),
        None => media.examples.values().next(),
    };
    if let Some(value) = named.and_then(|e| e.value.as_ref()) {
        return Some(ResolvedValue::from(value.clone()));
    }
    if let Some(value) = &media.example {
        return Some(ResolvedValue::from(value.clone()));
    }
    let schema = media.schema.as_ref()?;
    let options = ExampleOptions {
        xml: is_xml_media_type(mime_type),
        ..ExampleOptions::write()
    };
    generator.generate(schema, &options)
}

fn encode_value(mime_type: String, value: ResolvedValue) -> EncodedBody {
    if is_form_media_type(&mime_type) {
        if let ResolvedValue::Map(map) = &value {
            let mut params = Vec::new();
            flatten_form("", map, &mut params);
            return EncodedBody::Params { mime_type, params };
        }
        tracing::debug!("Form body for '{}' is not an object; sending JSON text", mime_type);
    }

    if is_xml_media_type(&mime_type) {
        if let ResolvedValue::Map(map) = &value {
            return match map_to_xml(map) {
                Ok(text) => EncodedBody::Text { mime_type, text },
                Err(err) => {
                    tracing::debug!("Skipping XML body: {}", err);
                    EncodedBody::NoBody
                }
            };
        }
    }

    EncodedBody::Text {
        mime_type,
        text: value.to_json_string(),
    }
}

/// Flattens a map into form fields.
///
/// Nested maps use dotted names, lists repeat the field name, `null` is
/// dropped. A file directly under a key has no text form and is dropped;
/// files inside lists render as `@filename`.
fn flatten_form(
    prefix: &str,
    map: &IndexMap<String, ResolvedValue>,
    out: &mut Vec<SerializedEntry>,
) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            ResolvedValue::Null | ResolvedValue::File(_) => {}
            ResolvedValue::Map(nested) => flatten_form(&name, nested, out),
            ResolvedValue::List(items) => {
                for item in items {
                    match item {
                        ResolvedValue::Null => {}
                        ResolvedValue::Map(nested) => flatten_form(&name, nested, out),
                        other => out.push(SerializedEntry::new(name.as_str(), stringify(other))),
                    }
                }
            }
            other => out.push(SerializedEntry::new(name.as_str(), stringify(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::examples::SchemaExampleGenerator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(content: JsonValue) -> RequestBodyDefinition {
        serde_json::from_value(json!({ "content": content })).unwrap()
    }

    fn encode(body: &RequestBodyDefinition, content_type: Option<&str>) -> EncodedBody {
        encode_body(
            Some(body),
            content_type,
            None,
            None,
            &SchemaExampleGenerator::new(),
        )
    }

    fn params(items: &[(&str, &str)]) -> Vec<SerializedEntry> {
        items.iter().map(|(n, v)| SerializedEntry::new(*n, *v)).collect()
    }

    #[test]
    fn test_json_from_schema_examples() {
        let body = body(json!({
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "example": "John Doe" },
                        "age": { "type": "number", "example": 30 }
                    }
                }
            }
        }));
        assert_eq!(
            encode(&body, Some("application/json")),
            EncodedBody::Text {
                mime_type: "application/json".into(),
                text: r#"{"name":"John Doe","age":30}"#.into()
            }
        );
    }

    #[test]
    fn test_defaults_without_examples() {
        let body = body(json!({
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": { "name": { "type": "string" }, "age": { "type": "number" } }
                }
            }
        }));
        assert_eq!(
            encode(&body, None),
            EncodedBody::Text {
                mime_type: "application/json".into(),
                text: r#"{"name":"","age":1}"#.into()
            }
        );
    }

    #[test]
    fn test_primitive_is_json_stringified() {
        let body = body(json!({
            "application/xml": {
                "schema": { "type": "string", "example": "<user><name>Bob</name></user>" }
            }
        }));
        assert_eq!(
            encode(&body, Some("application/xml")),
            EncodedBody::Text {
                mime_type: "application/xml".into(),
                text: r#""<user><name>Bob</name></user>""#.into()
            }
        );
    }

    #[test]
    fn test_priority_explicit_then_named_then_inline() {
        let body = body(json!({
            "application/json": {
                "example": { "from": "inline" },
                "examples": {
                    "first": { "value": { "from": "first" } },
                    "second": { "value": { "from": "second" } }
                },
                "schema": {
                    "type": "object",
                    "properties": { "from": { "type": "string", "example": "schema" } }
                }
            }
        }));
        let generator = SchemaExampleGenerator::new();
        let explicit = json!({ "from": "caller" });

        let text = |encoded: EncodedBody| encoded.into_post_data().unwrap().text.unwrap();
        assert_eq!(
            text(encode_body(Some(&body), None, Some(&explicit), Some("second"), &generator)),
            r#"{"from":"caller"}"#
        );
        assert_eq!(
            text(encode_body(Some(&body), None, None, Some("second"), &generator)),
            r#"{"from":"second"}"#
        );
        assert_eq!(
            text(encode_body(Some(&body), None, None, None, &generator)),
            r#"{"from":"first"}"#
        );
        assert_eq!(
            text(encode_body(Some(&body), None, None, Some("missing"), &generator)),
            r#"{"from":"inline"}"#
        );
    }

    #[test]
    fn test_multipart_flattening() {
        let body = body(json!({
            "multipart/form-data": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "file": { "type": "string", "format": "binary" },
                        "name": { "type": "string" },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string", "example": "document" }
                        },
                        "settings": {
                            "type": "object",
                            "properties": {
                                "public": { "type": "boolean", "example": false },
                                "quality": { "type": "string", "example": "high" }
                            }
                        },
                        "removed": { "type": "null" }
                    }
                }
            }
        }));
        assert_eq!(
            encode(&body, Some("multipart/form-data")),
            EncodedBody::Params {
                mime_type: "multipart/form-data".into(),
                params: params(&[
                    ("name", ""),
                    ("tags", "document"),
                    ("settings.public", "false"),
                    ("settings.quality", "high"),
                ])
            }
        );
    }

    #[test]
    fn test_file_list_renders_marker() {
        let body = body(json!({
            "multipart/form-data": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "files": {
                            "type": "array",
                            "items": { "type": "string", "format": "binary" }
                        }
                    }
                }
            }
        }));
        assert_eq!(
            encode(&body, None).into_post_data().unwrap().params,
            Some(params(&[("files", "@filename")]))
        );
    }

    #[test]
    fn test_empty_object_form_has_no_params() {
        let body = body(json!({
            "application/x-www-form-urlencoded": {
                "schema": { "type": "object", "properties": {} }
            }
        }));
        assert_eq!(
            encode(&body, None),
            EncodedBody::Params {
                mime_type: "application/x-www-form-urlencoded".into(),
                params: vec![]
            }
        );
    }

    #[test]
    fn test_xml_object_body() {
        let body = body(json!({
            "application/xml": {
                "schema": {
                    "type": "object",
                    "xml": { "name": "user" },
                    "properties": { "name": { "type": "string", "example": "Bob" } }
                }
            }
        }));
        let text = encode(&body, None).into_post_data().unwrap().text.unwrap();
        assert!(text.contains("<user>"));
        assert!(text.contains("<name>Bob</name>"));
    }

    #[test]
    fn test_no_body_and_legacy_shape() {
        let encoded = encode_body(None, None, None, None, &SchemaExampleGenerator::new());
        assert_eq!(encoded, EncodedBody::NoBody);
        assert_eq!(encoded.mime_type(), None);
        assert_eq!(
            serde_json::to_value(encoded.into_legacy()).unwrap(),
            json!({ "mimeType": "", "text": "null" })
        );

        let empty = body(json!({}));
        assert_eq!(encode(&empty, None), EncodedBody::NoBody);
    }

    #[test]
    fn test_media_type_classification() {
        assert!(is_form_media_type("multipart/form-data; boundary=x"));
        assert!(is_xml_media_type("application/atom+xml"));
        assert!(!is_xml_media_type("application/json"));
    }
}
