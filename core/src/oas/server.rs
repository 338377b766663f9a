#![deny(missing_docs)]

//! # Server URL Resolution
//!
//! Turns a Server Object plus a path template into the base URL of an assembled
//! request. Server variables are substituted; path-template placeholders
//! (`{id}`, `{;id}`, `{.id}`) are left for the parameter serializer.

use crate::oas::models::Server;
use url::Url;

/// Resolves the URL a request is sent to, before parameters are applied.
pub trait ServerUrlResolver {
    /// Joins the server URL and `path`. `None` yields the path alone.
    fn resolve(&self, server: Option<&Server>, path: &str) -> String;
}

/// Default resolver: variable defaults, one `/` between server and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardServerUrlResolver;

impl ServerUrlResolver for StandardServerUrlResolver {
    fn resolve(&self, server: Option<&Server>, path: &str) -> String {
        let Some(server) = server else {
            return path.to_string();
        };

        let base = normalize_base(&substitute_variables(server));
        let base = base.trim_end_matches('/');
        if path.is_empty() {
            return base.to_string();
        }
        if base.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Replaces `{variable}` segments of the server URL with their default value
/// (first enum entry when no default is declared).
pub fn substitute_variables(server: &Server) -> String {
    let mut url = server.url.clone();
    for (name, variable) in &server.variables {
        let value = variable
            .default
            .as_deref()
            .or_else(|| variable.enum_values.first().map(String::as_str));
        if let Some(value) = value {
            url = url.replace(&format!("{{{}}}", name), value);
        }
    }
    url
}

/// Normalizes absolute server URLs (scheme and host casing, default ports).
/// Relative or still-templated URLs are returned unchanged.
fn normalize_base(raw: &str) -> String {
    if raw.contains('{') {
        return raw.to_string();
    }
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => url.as_str().to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::ServerVariable;

    #[test]
    fn test_no_server_yields_path() {
        let resolver = StandardServerUrlResolver;
        assert_eq!(resolver.resolve(None, "/users/{id}"), "/users/{id}");
    }

    #[test]
    fn test_single_slash_join() {
        let resolver = StandardServerUrlResolver;
        let server = Server::new("https://api.example.com/v1/");
        assert_eq!(
            resolver.resolve(Some(&server), "/users/{id}"),
            "https://api.example.com/v1/users/{id}"
        );
    }

    #[test]
    fn test_matrix_placeholder_survives() {
        let resolver = StandardServerUrlResolver;
        let server = Server::new("https://example.com");
        assert_eq!(
            resolver.resolve(Some(&server), "/api/users{;color}"),
            "https://example.com/api/users{;color}"
        );
    }

    #[test]
    fn test_variables_use_default_then_enum() {
        let mut server = Server::new("https://{region}.example.com:{port}");
        server.variables.insert(
            "region".into(),
            ServerVariable {
                enum_values: vec!["eu".into(), "us".into()],
                ..Default::default()
            },
        );
        server.variables.insert(
            "port".into(),
            ServerVariable {
                default: Some("8443".into()),
                ..Default::default()
            },
        );
        let resolver = StandardServerUrlResolver;
        assert_eq!(
            resolver.resolve(Some(&server), "/ping"),
            "https://eu.example.com:8443/ping"
        );
    }

    #[test]
    fn test_relative_server() {
        let resolver = StandardServerUrlResolver;
        let server = Server::new("/api");
        assert_eq!(resolver.resolve(Some(&server), "/pets"), "/api/pets");
    }
}
