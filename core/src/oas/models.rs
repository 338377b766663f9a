#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Definition of the read-only input structures the request compiler consumes.
//!
//! These structs map directly to OpenAPI objects. Fields the compiler must be able
//! to reject without failing deserialization (`in`, `style`, `name`) are kept as raw
//! strings and interpreted through typed accessors, so a malformed parameter is
//! skipped instead of poisoning the whole operation.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Deserializes a field that is present, keeping an explicit `null` as `Some(Null)`.
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
pub(crate) fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// Path.
    Path,
    /// Query.
    Query,
    /// Header.
    Header,
    /// Cookie.
    Cookie,
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            other => Err(format!("Unknown parameter location '{}'", other)),
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        };
        f.write_str(s)
    }
}

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterStyle {
    /// `simple`
    #[default]
    Simple,
    /// `matrix`
    Matrix,
    /// `label`
    Label,
    /// `form`
    Form,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
}

impl FromStr for ParameterStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "matrix" => Ok(Self::Matrix),
            "label" => Ok(Self::Label),
            "form" => Ok(Self::Form),
            "spaceDelimited" => Ok(Self::SpaceDelimited),
            "pipeDelimited" => Ok(Self::PipeDelimited),
            "deepObject" => Ok(Self::DeepObject),
            other => Err(format!("Unknown parameter style '{}'", other)),
        }
    }
}

impl fmt::Display for ParameterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Simple => "simple",
            Self::Matrix => "matrix",
            Self::Label => "label",
            Self::Form => "form",
            Self::SpaceDelimited => "spaceDelimited",
            Self::PipeDelimited => "pipeDelimited",
            Self::DeepObject => "deepObject",
        };
        f.write_str(s)
    }
}

/// An Example Object (`examples.<key>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleObject {
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Embedded literal value. `null` is a legitimate value.
    #[serde(
        default,
        alias = "dataValue",
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<JsonValue>,
    /// Marks the parameter as switched off for this example.
    #[serde(rename = "x-disabled", default)]
    pub disabled: bool,
}

/// A Media Type Object (`content.<mediaType>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaTypeObject {
    /// Schema of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonValue>,
    /// Inline example.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<JsonValue>,
    /// Named examples, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, ExampleObject>,
}

impl MediaTypeObject {
    /// The named example for `key`, if declared.
    pub fn named_example(&self, key: &str) -> Option<&ExampleObject> {
        self.examples.get(key)
    }
}

/// A Parameter Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Name of the parameter. Parameters without a name are skipped.
    #[serde(default)]
    pub name: Option<String>,
    /// Raw location (`in`). Unknown locations are skipped.
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// A brief description of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Raw serialization style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Explode modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Schema definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonValue>,
    /// Content map. When present, style and explode are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaTypeObject>>,
    /// Single example value.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<JsonValue>,
    /// Named examples, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, ExampleObject>,
}

impl ParameterDefinition {
    /// Creates a parameter with a name and a location.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location.to_string()),
            ..Default::default()
        }
    }

    /// Sets the style.
    pub fn with_style(mut self, style: ParameterStyle) -> Self {
        self.style = Some(style.to_string());
        self
    }

    /// Sets the explode modifier.
    pub fn with_explode(mut self, explode: bool) -> Self {
        self.explode = Some(explode);
        self
    }

    /// Sets the schema.
    pub fn with_schema(mut self, schema: JsonValue) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The parameter name, if present and non-empty.
    pub fn param_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The typed location, if recognized.
    pub fn param_location(&self) -> Option<ParameterLocation> {
        self.location.as_deref().and_then(|l| l.parse().ok())
    }

    /// The first content entry (media type, object), if the parameter uses `content`.
    pub fn first_content(&self) -> Option<(&str, &MediaTypeObject)> {
        self.content
            .as_ref()
            .and_then(|c| c.iter().next())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// The declared schema `type` (first entry for type arrays), looking into
    /// the first content schema when no bare schema exists.
    pub fn schema_type(&self) -> Option<&str> {
        let schema = self
            .schema
            .as_ref()
            .or_else(|| self.first_content().and_then(|(_, m)| m.schema.as_ref()))?;
        match schema.get("type")? {
            JsonValue::String(s) => Some(s.as_str()),
            JsonValue::Array(types) => types.iter().filter_map(|t| t.as_str()).next(),
            _ => None,
        }
    }
}

/// A Request Body Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyDefinition {
    /// A brief description of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the body is required.
    #[serde(default)]
    pub required: bool,
    /// Media types in declaration order.
    #[serde(rename = "content", default)]
    pub content_by_media_type: IndexMap<String, MediaTypeObject>,
}

impl RequestBodyDefinition {
    /// The first declared media type key.
    pub fn first_media_type(&self) -> Option<&str> {
        self.content_by_media_type.keys().next().map(|k| k.as_str())
    }
}

/// A single security requirement: scheme name to scopes (AND logic).
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// An Operation Object, with parameters and body already dereferenced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Request body definition (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDefinition>,
    /// Security requirements (alternatives, OR logic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// A Server Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// URL template, possibly relative and possibly with `{variables}`.
    pub url: String,
    /// A brief description of the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variables substituted into the URL template.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// Creates a server without variables.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// A Server Variable Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    /// Default substitution value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// A brief description of the variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
