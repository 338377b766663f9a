#![deny(missing_docs)]

//! # Default Headers
//!
//! Headers added before parameters are processed, unless the operation declares
//! a header parameter with the same name.

use crate::oas::models::{Operation, ParameterLocation};

/// A default header candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultHeader {
    /// Header name.
    pub name: String,
    /// Value used when the header is not overridden.
    pub default_value: String,
    /// The operation supplies this header itself.
    pub is_overridden: bool,
}

/// Supplies default headers for an operation.
pub trait DefaultHeaderProvider {
    /// Default headers for `operation`, in insertion order.
    ///
    /// `content_type` is the media type chosen for the body, if any.
    fn default_headers(
        &self,
        method: &str,
        operation: &Operation,
        content_type: Option<&str>,
        example_key: Option<&str>,
    ) -> Vec<DefaultHeader>;
}

/// `Accept: */*`, plus `Content-Type` when the operation has a body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHeaderProvider;

impl DefaultHeaderProvider for StandardHeaderProvider {
    fn default_headers(
        &self,
        _method: &str,
        operation: &Operation,
        content_type: Option<&str>,
        _example_key: Option<&str>,
    ) -> Vec<DefaultHeader> {
        let overridden = |name: &str| {
            operation.parameters.iter().any(|p| {
                p.param_location() == Some(ParameterLocation::Header)
                    && p.param_name().is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
        };
        let header = |name: &str, value: &str| DefaultHeader {
            name: name.to_string(),
            default_value: value.to_string(),
            is_overridden: overridden(name),
        };

        let mut headers = vec![header("Accept", "*/*")];
        let body_type = operation.request_body.as_ref().and_then(|body| {
            content_type
                .map(str::to_string)
                .or_else(|| body.first_media_type().map(str::to_string))
        });
        if let Some(body_type) = body_type {
            headers.push(header("Content-Type", &body_type));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::ParameterDefinition;
    use serde_json::json;

    #[test]
    fn test_accept_only_without_body() {
        let headers =
            StandardHeaderProvider.default_headers("get", &Operation::default(), None, None);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "Accept");
        assert_eq!(headers[0].default_value, "*/*");
        assert!(!headers[0].is_overridden);
    }

    #[test]
    fn test_content_type_for_body() {
        let operation: Operation = serde_json::from_value(json!({
            "requestBody": { "content": { "application/xml": {}, "application/json": {} } }
        }))
        .unwrap();
        let first = StandardHeaderProvider.default_headers("post", &operation, None, None);
        assert_eq!(first[1].default_value, "application/xml");
        let chosen = StandardHeaderProvider.default_headers(
            "post",
            &operation,
            Some("application/json"),
            None,
        );
        assert_eq!(chosen[1].default_value, "application/json");
    }

    #[test]
    fn test_header_parameter_overrides() {
        let operation = Operation {
            parameters: vec![ParameterDefinition::new("accept", ParameterLocation::Header)],
            ..Default::default()
        };
        let headers = StandardHeaderProvider.default_headers("get", &operation, None, None);
        assert!(headers[0].is_overridden);
    }
}
