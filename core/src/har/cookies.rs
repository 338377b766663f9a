#![deny(missing_docs)]

//! # Global Cookies
//!
//! Cookies configured once for a whole document and attached to every request
//! they apply to.

use crate::har::models::SerializedEntry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Example key used for the disabled-cookie map when none is selected.
pub const DEFAULT_EXAMPLE_KEY: &str = "default";

/// A document-wide cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalCookie {
    /// Cookie name. Empty names never apply.
    pub name: String,
    /// Cookie value.
    #[serde(default)]
    pub value: String,
    /// Domain restriction. A leading `.` also matches subdomains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Path prefix restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Switched off everywhere.
    #[serde(default)]
    pub is_disabled: bool,
}

impl GlobalCookie {
    /// A cookie without restrictions.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// Example key to cookie name to "disabled".
pub type DisabledCookies = IndexMap<String, IndexMap<String, bool>>;

/// Decides whether a global cookie is attached to a request.
pub trait CookieFilter {
    /// True when `cookie` applies to `url` for the selected example.
    fn applies(
        &self,
        cookie: &GlobalCookie,
        url: &str,
        disabled: &DisabledCookies,
        example_key: Option<&str>,
    ) -> bool;
}

/// Default filter: disabled flags, then domain and path matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCookieFilter;

impl CookieFilter for StandardCookieFilter {
    fn applies(
        &self,
        cookie: &GlobalCookie,
        url: &str,
        disabled: &DisabledCookies,
        example_key: Option<&str>,
    ) -> bool {
        if cookie.name.is_empty() || cookie.is_disabled {
            return false;
        }
        let key = example_key.unwrap_or(DEFAULT_EXAMPLE_KEY);
        if disabled
            .get(key)
            .and_then(|cookies| cookies.get(&cookie.name))
            .copied()
            .unwrap_or(false)
        {
            return false;
        }

        let parsed = Url::parse(url).ok();

        if let Some(domain) = cookie.domain.as_deref().filter(|d| !d.is_empty()) {
            let Some(host) = parsed.as_ref().and_then(|u| u.host_str()) else {
                return false;
            };
            if !domain_matches(host, domain) {
                return false;
            }
        }

        if let Some(path) = cookie.path.as_deref().filter(|p| !p.is_empty()) {
            let url_path = match &parsed {
                Some(u) => u.path().to_string(),
                None => url.split('?').next().unwrap_or_default().to_string(),
            };
            if !url_path.starts_with(path.trim_end_matches('/')) {
                return false;
            }
        }

        true
    }
}

/// `example.com` matches only itself; `.example.com` also matches subdomains.
fn domain_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    match domain.strip_prefix('.') {
        Some(base) => host == base || host.ends_with(&domain),
        None => host == domain,
    }
}

/// Filters global cookies and renders the ones that apply.
pub fn applicable_cookies(
    filter: &dyn CookieFilter,
    cookies: &[GlobalCookie],
    url: &str,
    disabled: &DisabledCookies,
    example_key: Option<&str>,
) -> Vec<SerializedEntry> {
    cookies
        .iter()
        .filter(|cookie| filter.applies(cookie, url, disabled, example_key))
        .map(|cookie| SerializedEntry::new(cookie.name.as_str(), cookie.value.as_str()))
        .collect()
}
