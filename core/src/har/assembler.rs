#![deny(missing_docs)]

//! # Request Assembly
//!
//! Compiles one operation plus its context into an [`AssembledRequest`].
//!
//! Steps, in order:
//! 1. Base request from the server URL and path template.
//! 2. Default headers that the operation does not override.
//! 3. Parameters (path, query, header, cookie), then applicable global cookies
//!    ahead of the parameter cookies.
//! 4. Body, merging `Content-Type` into the headers. A declared body that
//!    yields nothing keeps the `{mimeType: "", text: "null"}` shape.
//! 5. Security schemes, appended last.
//! 6. Header block size.
//!
//! Collaborators sit behind traits so callers can replace any of them.

use crate::har::body::{encode_body, EncodedBody};
use crate::har::cookies::{
    applicable_cookies, CookieFilter, DisabledCookies, GlobalCookie, StandardCookieFilter,
};
use crate::har::headers::{DefaultHeaderProvider, StandardHeaderProvider};
use crate::har::models::{headers_size, AssembledRequest, SerializedEntry};
use crate::har::params::{resolve_parameter_value, serialize_parameter, SerializedParameter};
use crate::har::security::{inject_security, SecuritySchemeSecret};
use crate::oas::examples::{ExampleGenerator, SchemaExampleGenerator};
use crate::oas::models::{Operation, Server};
use crate::oas::server::{ServerUrlResolver, StandardServerUrlResolver};
use serde_json::Value as JsonValue;

/// Everything an assembly needs besides the collaborators.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// The operation, with parameters and body already dereferenced.
    pub operation: &'a Operation,
    /// HTTP method, copied to the output as given.
    pub method: &'a str,
    /// Path template, e.g. `/users/{id}`.
    pub path: &'a str,
    /// Target server. `None` keeps the URL relative.
    pub server: Option<&'a Server>,
    /// Media type for the body. Defaults to the first declared one.
    pub content_type: Option<&'a str>,
    /// Named example to use for parameters and body.
    pub example_key: Option<&'a str>,
    /// Caller supplied body value. Wins over every example.
    pub body_example: Option<&'a JsonValue>,
    /// Security schemes with their secrets, in requirement order.
    pub security_schemes: &'a [SecuritySchemeSecret],
    /// Add `Accept` and `Content-Type` defaults.
    pub include_default_headers: bool,
    /// Document-wide cookies.
    pub global_cookies: &'a [GlobalCookie],
    /// Cookies disabled per example key.
    pub disabled_cookies: Option<&'a DisabledCookies>,
}

impl<'a> RequestContext<'a> {
    /// A context with no server, examples, security or cookies.
    pub fn new(operation: &'a Operation, method: &'a str, path: &'a str) -> Self {
        Self {
            operation,
            method,
            path,
            server: None,
            content_type: None,
            example_key: None,
            body_example: None,
            security_schemes: &[],
            include_default_headers: false,
            global_cookies: &[],
            disabled_cookies: None,
        }
    }
}

/// Compiles operations into requests.
pub struct RequestAssembler {
    server_resolver: Box<dyn ServerUrlResolver>,
    header_provider: Box<dyn DefaultHeaderProvider>,
    cookie_filter: Box<dyn CookieFilter>,
    generator: Box<dyn ExampleGenerator>,
}

impl Default for RequestAssembler {
    fn default() -> Self {
        Self::standard()
    }
}

impl RequestAssembler {
    /// Assembler with the standard collaborators and no `$ref` resolution
    /// for schemas.
    pub fn standard() -> Self {
        Self {
            server_resolver: Box::new(StandardServerUrlResolver),
            header_provider: Box::new(StandardHeaderProvider),
            cookie_filter: Box::new(StandardCookieFilter),
            generator: Box::new(SchemaExampleGenerator::new()),
        }
    }

    /// Replaces the example generator.
    pub fn with_generator(mut self, generator: impl ExampleGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Replaces the server URL resolver.
    pub fn with_server_resolver(mut self, resolver: impl ServerUrlResolver + 'static) -> Self {
        self.server_resolver = Box::new(resolver);
        self
    }

    /// Replaces the default header provider.
    pub fn with_header_provider(mut self, provider: impl DefaultHeaderProvider + 'static) -> Self {
        self.header_provider = Box::new(provider);
        self
    }

    /// Replaces the global cookie filter.
    pub fn with_cookie_filter(mut self, filter: impl CookieFilter + 'static) -> Self {
        self.cookie_filter = Box::new(filter);
        self
    }

    /// Assembles the request. Never fails: malformed pieces are skipped.
    pub fn assemble(&self, ctx: &RequestContext<'_>) -> AssembledRequest {
        let url = self.server_resolver.resolve(ctx.server, ctx.path);
        let mut request = AssembledRequest::new(ctx.method, url);

        if ctx.include_default_headers {
            request.headers.extend(
                self.header_provider
                    .default_headers(ctx.method, ctx.operation, ctx.content_type, ctx.example_key)
                    .into_iter()
                    .filter(|h| !h.is_overridden)
                    .map(|h| SerializedEntry::new(h.name, h.default_value)),
            );
        }

        let mut parameter_cookies = Vec::new();
        for param in &ctx.operation.parameters {
            let Some(value) =
                resolve_parameter_value(param, ctx.example_key, self.generator.as_ref())
            else {
                continue;
            };
            match serialize_parameter(param, &value, &request.url) {
                Some(SerializedParameter::Path(url)) => request.url = url,
                Some(SerializedParameter::Query(entries)) => request.query_string.extend(entries),
                Some(SerializedParameter::Header(entries)) => request.headers.extend(entries),
                Some(SerializedParameter::Cookie(entries)) => parameter_cookies.extend(entries),
                None => {}
            }
        }

        let no_disabled = DisabledCookies::new();
        request.cookies = applicable_cookies(
            self.cookie_filter.as_ref(),
            ctx.global_cookies,
            &request.url,
            ctx.disabled_cookies.unwrap_or(&no_disabled),
            ctx.example_key,
        );
        request.cookies.extend(parameter_cookies);

        let encoded = encode_body(
            ctx.operation.request_body.as_ref(),
            ctx.content_type,
            ctx.body_example,
            ctx.example_key,
            self.generator.as_ref(),
        );
        if let Some(mime_type) = encoded.mime_type() {
            merge_content_type(&mut request.headers, mime_type);
        }
        let declared = ctx.operation.request_body.is_some();
        request.body = match encoded {
            EncodedBody::NoBody if declared => Some(EncodedBody::NoBody.into_legacy()),
            other => other.into_post_data(),
        };
        if let Some(text) = request.body.as_ref().and_then(|b| b.text.as_ref()) {
            request.body_size = text.len() as i64;
        }

        let security = inject_security(ctx.security_schemes);
        request.headers.extend(security.headers);
        request.query_string.extend(security.query_string);
        request.cookies.extend(security.cookies);

        request.headers_size = headers_size(&request.headers);
        request
    }
}

/// Keeps a non-empty `Content-Type`, fills an empty one, appends when absent.
fn merge_content_type(headers: &mut Vec<SerializedEntry>, mime_type: &str) {
    match headers
        .iter_mut()
        .find(|h| h.name.eq_ignore_ascii_case("Content-Type"))
    {
        Some(existing) if existing.value.is_empty() => existing.value = mime_type.to_string(),
        Some(_) => {}
        None => headers.push(SerializedEntry::new("Content-Type", mime_type)),
    }
}
