#![deny(missing_docs)]

//! # Assembly Configuration
//!
//! YAML options shared by every assembled request: default headers, body
//! selection, cookies and scheme credentials.
//!
//! ```yaml
//! includeDefaultHeaders: true
//! contentType: application/json
//! exampleKey: admin
//! globalCookies:
//!   - name: session
//!     value: abc
//!     domain: .example.com
//! disabledCookies:
//!   admin:
//!     session: true
//! secrets:
//!   bearerAuth:
//!     token: my-token
//! ```

use crate::error::CliResult;
use indexmap::IndexMap;
use reqgen_core::har::cookies::{DisabledCookies, GlobalCookie};
use reqgen_core::har::security::SchemeCredentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Options applied to an assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyOptions {
    /// Add `Accept` and `Content-Type` defaults.
    #[serde(default = "default_true")]
    pub include_default_headers: bool,
    /// Media type to encode the body as.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Named example for parameters and body.
    #[serde(default)]
    pub example_key: Option<String>,
    /// Document-wide cookies.
    #[serde(default)]
    pub global_cookies: Vec<GlobalCookie>,
    /// Cookies disabled per example key.
    #[serde(default)]
    pub disabled_cookies: DisabledCookies,
    /// Credentials per security scheme name.
    #[serde(default)]
    pub secrets: IndexMap<String, SchemeCredentials>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            include_default_headers: true,
            content_type: None,
            example_key: None,
            global_cookies: Vec::new(),
            disabled_cookies: DisabledCookies::new(),
            secrets: IndexMap::new(),
        }
    }
}

impl AssemblyOptions {
    /// Reads options from a YAML file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}
