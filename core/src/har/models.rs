#![deny(missing_docs)]

//! # Request Models
//!
//! The HAR-like output of the request compiler.
//!
//! Field names and ordering are part of the output contract: code-sample
//! generators and test runners consume the serialized shape directly.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters left untouched when rendering query components.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP version reported on every assembled request.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// A single name/value pair of a header, query string or cookie list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEntry {
    /// Entry name.
    pub name: String,
    /// Wire value.
    pub value: String,
}

impl SerializedEntry {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    /// Media type of the body.
    pub mime_type: String,
    /// Text body (JSON, XML, plain).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Form fields (multipart, urlencoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<SerializedEntry>>,
}

/// The fully assembled request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledRequest {
    /// HTTP method, as supplied by the caller.
    pub method: String,
    /// Server URL plus path, with path parameters applied.
    pub url: String,
    /// Always `HTTP/1.1`.
    pub http_version: String,
    /// Headers in insertion order.
    pub headers: Vec<SerializedEntry>,
    /// Query entries in insertion order.
    pub query_string: Vec<SerializedEntry>,
    /// Cookies in insertion order.
    pub cookies: Vec<SerializedEntry>,
    /// Encoded body, if any.
    #[serde(rename = "postData", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostData>,
    /// Byte size of the header block, `-1` until computed.
    pub headers_size: i64,
    /// Byte size of a text body, `-1` otherwise.
    pub body_size: i64,
}

impl AssembledRequest {
    /// A request with empty collections and unknown sizes.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            http_version: HTTP_VERSION.to_string(),
            headers: Vec::new(),
            query_string: Vec::new(),
            cookies: Vec::new(),
            body: None,
            headers_size: -1,
            body_size: -1,
        }
    }

    /// First header with `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&SerializedEntry> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
    }

    /// The URL with the query string appended, names and values percent-encoded.
    pub fn full_url(&self) -> String {
        if self.query_string.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query_string
            .iter()
            .map(|entry| {
                format!(
                    "{}={}",
                    utf8_percent_encode(&entry.name, QUERY_COMPONENT),
                    utf8_percent_encode(&entry.value, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, query)
    }
}

/// Size of a header block: each header counts as `"Name: value\r\n"`.
pub fn headers_size(headers: &[SerializedEntry]) -> i64 {
    headers
        .iter()
        .map(|h| (h.name.len() + 2 + h.value.len() + 2) as i64)
        .sum()
}
