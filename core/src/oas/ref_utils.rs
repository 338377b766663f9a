#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for resolving local `$ref` targets (`#/components/...`) inside a
//! loaded document.
//!
//! These utilities never fetch external documents. A reference that is not a local
//! JSON Pointer resolves to `None`, which callers treat as an absent value.

use percent_encoding::percent_decode_str;
use serde_json::Value as JsonValue;

/// Returns the `$ref` string of a reference object, if the value is one.
pub(crate) fn ref_target(value: &JsonValue) -> Option<&str> {
    value.get("$ref").and_then(|r| r.as_str())
}

/// Resolves a local JSON Pointer reference (`#/a/b/c`) against `root`.
///
/// Returns `None` if the reference is external or the pointer does not exist.
pub(crate) fn resolve_pointer<'a>(root: &'a JsonValue, ref_str: &str) -> Option<&'a JsonValue> {
    let pointer = ref_str.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in pointer.trim_start_matches('/').split('/') {
        let key = decode_pointer_segment(segment);
        current = match current {
            JsonValue::Object(map) => map.get(&key)?,
            JsonValue::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Follows `$ref` chains until a concrete object is reached.
///
/// Gives up after a fixed number of hops so self-referencing chains terminate.
pub(crate) fn resolve_chain<'a>(
    root: &'a JsonValue,
    value: &'a JsonValue,
) -> Option<&'a JsonValue> {
    let mut current = value;
    for _ in 0..16 {
        match ref_target(current) {
            Some(target) => current = resolve_pointer(root, target)?,
            None => return Some(current),
        }
    }
    None
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
