#![deny(missing_docs)]

//! # Security Scheme Injection
//!
//! Turns security schemes that already carry their secrets into header, query
//! and cookie entries.
//!
//! Missing secrets are replaced by placeholders so the generated request stays
//! complete. Unsupported scheme types produce nothing.

use crate::har::models::SerializedEntry;
use crate::oas::models::ParameterLocation;
use base64::{engine::general_purpose::STANDARD, Engine};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder for a missing token.
pub const TOKEN_PLACEHOLDER: &str = "YOUR_SECRET_TOKEN";

/// Placeholder header value for basic auth without credentials.
pub const BASIC_PLACEHOLDER: &str = "Basic username:password";

/// A security scheme plus the secret material resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecuritySchemeSecret {
    /// `apiKey`
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeySecret),
    /// `http` (basic, bearer)
    #[serde(rename = "http")]
    Http(HttpSecret),
    /// `oauth2`
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Secret),
    /// Any other type (`openIdConnect`, `mutualTLS`, ...).
    #[serde(other)]
    Unsupported,
}

/// An API key scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySecret {
    /// Header, query or cookie name.
    #[serde(default)]
    pub name: Option<String>,
    /// Raw location (`in`).
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// The key.
    #[serde(default, alias = "x-scalar-secret-token")]
    pub secret_token: Option<String>,
}

/// An HTTP authentication scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSecret {
    /// `basic` or `bearer`.
    #[serde(default)]
    pub scheme: String,
    /// Bearer token.
    #[serde(default, alias = "x-scalar-secret-token")]
    pub secret_token: Option<String>,
    /// Basic auth user name.
    #[serde(default, alias = "x-scalar-secret-username")]
    pub secret_username: Option<String>,
    /// Basic auth password.
    #[serde(default, alias = "x-scalar-secret-password")]
    pub secret_password: Option<String>,
}

/// An OAuth 2 scheme. Flows keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Secret {
    /// Flow name (`authorizationCode`, `clientCredentials`, ...) to its secret.
    #[serde(default)]
    pub flows: IndexMap<String, OAuthFlowSecret>,
}

/// The secret of one OAuth 2 flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlowSecret {
    /// Access token obtained for this flow.
    #[serde(default, alias = "x-scalar-secret-token")]
    pub secret_token: Option<String>,
}

/// Secret material configured for one scheme, before it is merged into the
/// scheme definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeCredentials {
    /// API key, bearer token, or the OAuth 2 token for every flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Basic auth user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic auth password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// OAuth 2 tokens per flow name. Wins over `token`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub flows: IndexMap<String, String>,
}

/// Entries produced by security schemes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityEntries {
    /// Header entries.
    pub headers: Vec<SerializedEntry>,
    /// Query string entries.
    pub query_string: Vec<SerializedEntry>,
    /// Cookie entries.
    pub cookies: Vec<SerializedEntry>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Injects every scheme in order. Schemes are not deduplicated.
pub fn inject_security(schemes: &[SecuritySchemeSecret]) -> SecurityEntries {
    let mut entries = SecurityEntries::default();

    for scheme in schemes {
        match scheme {
            SecuritySchemeSecret::ApiKey(api_key) => {
                let Some(name) = non_empty(&api_key.name) else {
                    tracing::debug!("Skipping apiKey scheme without a name");
                    continue;
                };
                let value = non_empty(&api_key.secret_token).unwrap_or(TOKEN_PLACEHOLDER);
                let entry = SerializedEntry::new(name, value);
                let location = api_key
                    .location
                    .as_deref()
                    .and_then(|l| l.parse::<ParameterLocation>().ok());
                match location {
                    Some(ParameterLocation::Header) => entries.headers.push(entry),
                    Some(ParameterLocation::Query) => entries.query_string.push(entry),
                    Some(ParameterLocation::Cookie) => entries.cookies.push(entry),
                    _ => tracing::debug!(
                        "Skipping apiKey scheme '{}' with location {:?}",
                        name,
                        api_key.location
                    ),
                }
            }
            SecuritySchemeSecret::Http(http) => {
                let value = if http.scheme.eq_ignore_ascii_case("basic") {
                    basic_authorization(http)
                } else if http.scheme.eq_ignore_ascii_case("bearer") {
                    format!(
                        "Bearer {}",
                        non_empty(&http.secret_token).unwrap_or(TOKEN_PLACEHOLDER)
                    )
                } else {
                    tracing::debug!("Skipping unsupported http scheme '{}'", http.scheme);
                    continue;
                };
                entries
                    .headers
                    .push(SerializedEntry::new("Authorization", value));
            }
            SecuritySchemeSecret::OAuth2(oauth) => {
                let token = oauth
                    .flows
                    .values()
                    .find_map(|flow| non_empty(&flow.secret_token))
                    .unwrap_or(TOKEN_PLACEHOLDER);
                entries
                    .headers
                    .push(SerializedEntry::new("Authorization", format!("Bearer {}", token)));
            }
            SecuritySchemeSecret::Unsupported => {
                tracing::debug!("Skipping unsupported security scheme type");
            }
        }
    }

    entries
}

/// `Basic <base64(username:password)>`, or the literal placeholder when both
/// credentials are empty.
fn basic_authorization(http: &HttpSecret) -> String {
    let username = http.secret_username.as_deref().unwrap_or_default();
    let password = http.secret_password.as_deref().unwrap_or_default();
    if username.is_empty() && password.is_empty() {
        return BASIC_PLACEHOLDER.to_string();
    }
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}
