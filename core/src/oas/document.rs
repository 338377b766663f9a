#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Loads a JSON or YAML OpenAPI document and prepares operations for assembly:
//!
//! - Path-item and operation parameters merged (operation wins on `name` + `in`).
//! - Parameter, request body and example `$ref`s resolved locally.
//! - Effective security (operation level, else document level).
//! - Security schemes materialized with configured credentials.

use crate::error::{AppError, AppResult};
use crate::har::security::{SchemeCredentials, SecuritySchemeSecret};
use crate::oas::examples::SchemaExampleGenerator;
use crate::oas::models::{Operation, ParameterDefinition, RequestBodyDefinition, Server};
use crate::oas::ref_utils::{ref_target, resolve_chain, resolve_pointer};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;

/// HTTP methods an OpenAPI path item can hold, in listing order.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A parsed OpenAPI document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    raw: JsonValue,
}

/// One operation in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSummary {
    /// Lowercase HTTP method.
    pub method: String,
    /// Path template.
    pub path: String,
    /// `operationId`, if declared.
    pub operation_id: Option<String>,
    /// `summary`, if declared.
    pub summary: Option<String>,
}

impl FromStr for OpenApiDocument {
    type Err = AppError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::parse(content)
    }
}

impl OpenApiDocument {
    /// Parses JSON (when the content starts with `{`) or YAML.
    pub fn parse(content: &str) -> AppResult<Self> {
        let raw: JsonValue = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        if !raw.is_object() {
            return Err(AppError::General("OpenAPI document must be an object".to_string()));
        }
        Ok(Self { raw })
    }

    /// Wraps an already parsed document.
    pub fn from_value(raw: JsonValue) -> Self {
        Self { raw }
    }

    /// The raw document.
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// An example generator resolving `$ref`s against this document.
    pub fn example_generator(&self) -> SchemaExampleGenerator {
        SchemaExampleGenerator::with_document(self.raw.clone())
    }

    /// Every operation, in path order then method order.
    pub fn operations(&self) -> Vec<OperationSummary> {
        let Some(paths) = self.raw.get("paths").and_then(|p| p.as_object()) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (path, item) in paths {
            let Some(item) = self.resolve(item) else {
                continue;
            };
            for method in HTTP_METHODS {
                if let Some(op) = item.get(method) {
                    let text =
                        |key: &str| op.get(key).and_then(|v| v.as_str()).map(str::to_string);
                    out.push(OperationSummary {
                        method: method.to_string(),
                        path: path.clone(),
                        operation_id: text("operationId"),
                        summary: text("summary"),
                    });
                }
            }
        }
        out
    }

    /// Servers for an operation: operation level, then path level, then document level.
    pub fn servers_for(&self, path: &str, method: &str) -> Vec<Server> {
        let item = self.path_item(path);
        let op = item.and_then(|i| i.get(method.to_ascii_lowercase()));
        [op, item, Some(&self.raw)]
            .into_iter()
            .flatten()
            .filter_map(|node| node.get("servers"))
            .find_map(|servers| serde_json::from_value::<Vec<Server>>(servers.clone()).ok())
            .unwrap_or_default()
    }

    /// Looks up an operation and prepares it for assembly.
    pub fn find_operation(&self, path: &str, method: &str) -> AppResult<Operation> {
        let not_found = || {
            AppError::General(format!(
                "Operation not found: {} {}",
                method.to_uppercase(),
                path
            ))
        };
        let item = self.path_item(path).ok_or_else(not_found)?;
        let op = item
            .get(method.to_ascii_lowercase())
            .and_then(|op| self.resolve(op))
            .ok_or_else(not_found)?;

        let mut shell = op.clone();
        if let Some(obj) = shell.as_object_mut() {
            obj.remove("parameters");
            obj.remove("requestBody");
        }
        let mut operation: Operation = serde_json::from_value(shell)?;

        operation.parameters = self.merged_parameters(item, op);
        operation.request_body = op
            .get("requestBody")
            .and_then(|body| self.request_body(body));
        if operation.security.is_none() {
            operation.security = self
                .raw
                .get("security")
                .and_then(|s| serde_json::from_value(s.clone()).ok());
        }
        Ok(operation)
    }

    /// Materializes the schemes of the operation's first security requirement,
    /// in requirement order, with `credentials` merged in by scheme name.
    ///
    /// Unknown scheme names are skipped.
    pub fn security_schemes_for(
        &self,
        operation: &Operation,
        credentials: &IndexMap<String, SchemeCredentials>,
    ) -> Vec<SecuritySchemeSecret> {
        let Some(requirement) = operation.security.as_ref().and_then(|s| s.first()) else {
            return Vec::new();
        };
        let schemes = self
            .raw
            .pointer("/components/securitySchemes")
            .and_then(|s| s.as_object());

        requirement
            .keys()
            .filter_map(|name| {
                let definition = schemes
                    .and_then(|s| s.get(name))
                    .and_then(|d| self.resolve(d));
                let Some(definition) = definition else {
                    tracing::debug!("Security scheme '{}' is not defined", name);
                    return None;
                };
                let merged = merge_credentials(definition, credentials.get(name));
                match serde_json::from_value::<SecuritySchemeSecret>(merged) {
                    Ok(scheme) => Some(scheme),
                    Err(err) => {
                        tracing::debug!("Skipping security scheme '{}': {}", name, err);
                        None
                    }
                }
            })
            .collect()
    }

    fn resolve<'a>(&'a self, value: &'a JsonValue) -> Option<&'a JsonValue> {
        resolve_chain(&self.raw, value)
    }

    fn path_item(&self, path: &str) -> Option<&JsonValue> {
        self.raw
            .get("paths")
            .and_then(|p| p.get(path))
            .and_then(|item| self.resolve(item))
    }

    fn merged_parameters(&self, item: &JsonValue, op: &JsonValue) -> Vec<ParameterDefinition> {
        let mut merged: Vec<ParameterDefinition> = Vec::new();
        let sources = [item.get("parameters"), op.get("parameters")];
        for list in sources.into_iter().flatten().filter_map(|l| l.as_array()) {
            for raw in list {
                let Some(param) = self.parameter(raw) else {
                    continue;
                };
                let same = merged
                    .iter()
                    .position(|p| p.name == param.name && p.location == param.location);
                match same {
                    Some(index) => merged[index] = param,
                    None => merged.push(param),
                }
            }
        }
        merged
    }

    fn parameter(&self, raw: &JsonValue) -> Option<ParameterDefinition> {
        let Some(resolved) = self.resolve(raw) else {
            tracing::debug!("Skipping unresolvable parameter {:?}", ref_target(raw));
            return None;
        };
        let mut resolved = resolved.clone();
        self.inline_examples(&mut resolved);
        match serde_json::from_value(resolved) {
            Ok(param) => Some(param),
            Err(err) => {
                tracing::debug!("Skipping malformed parameter: {}", err);
                None
            }
        }
    }

    fn request_body(&self, raw: &JsonValue) -> Option<RequestBodyDefinition> {
        let mut resolved = self.resolve(raw)?.clone();
        self.inline_examples(&mut resolved);
        match serde_json::from_value(resolved) {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::debug!("Skipping malformed request body: {}", err);
                None
            }
        }
    }

    /// Replaces `$ref` entries of `examples` maps (on the node itself and on
    /// every `content` media type) with their targets.
    fn inline_examples(&self, node: &mut JsonValue) {
        self.inline_example_map(node.get_mut("examples"));
        if let Some(content) = node.get_mut("content").and_then(|c| c.as_object_mut()) {
            for media in content.values_mut() {
                self.inline_example_map(media.get_mut("examples"));
            }
        }
    }

    fn inline_example_map(&self, examples: Option<&mut JsonValue>) {
        let Some(examples) = examples.and_then(|e| e.as_object_mut()) else {
            return;
        };
        for example in examples.values_mut() {
            let target = ref_target(example).and_then(|t| resolve_pointer(&self.raw, t));
            if let Some(target) = target {
                *example = target.clone();
            }
        }
    }
}

/// Copies configured credentials into a scheme definition as `secret*` fields.
fn merge_credentials(definition: &JsonValue, credentials: Option<&SchemeCredentials>) -> JsonValue {
    let mut merged = definition.clone();
    let Some(credentials) = credentials else {
        return merged;
    };
    let Some(obj) = merged.as_object_mut() else {
        return merged;
    };

    let set = |obj: &mut Map<String, JsonValue>, key: &str, value: &Option<String>| {
        if let Some(value) = value {
            obj.insert(key.to_string(), JsonValue::String(value.clone()));
        }
    };
    set(obj, "secretToken", &credentials.token);
    set(obj, "secretUsername", &credentials.username);
    set(obj, "secretPassword", &credentials.password);

    if let Some(flows) = obj.get_mut("flows").and_then(|f| f.as_object_mut()) {
        for (flow_name, flow) in flows.iter_mut() {
            let token = credentials
                .flows
                .get(flow_name)
                .cloned()
                .or_else(|| credentials.token.clone());
            if let (Some(token), Some(flow)) = (token, flow.as_object_mut()) {
                flow.insert("secretToken".to_string(), JsonValue::String(token));
            }
        }
    }
    merged
}
