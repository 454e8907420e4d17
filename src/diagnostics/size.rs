//! Size Estimation
//!
//! Rough byte accounting for cached entries. Numbers count 8 bytes, strings
//! 2 bytes per UTF-16 unit, booleans 4, containers the sum of their keys and
//! values. The figures are approximate and only used for diagnostics.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{Entry, Selector};

const NUMBER_BYTES: u64 = 8;
const BOOL_BYTES: u64 = 4;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Approximate size of a string.
pub fn string_bytes(s: &str) -> u64 {
    s.encode_utf16().count() as u64 * 2
}

// == Value Size ==
/// Approximate size of a JSON value.
pub fn value_bytes(value: &Value) -> u64 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => BOOL_BYTES,
        Value::Number(_) => NUMBER_BYTES,
        Value::String(s) => string_bytes(s),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| string_bytes(&index.to_string()) + value_bytes(item))
            .sum(),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| string_bytes(key) + value_bytes(item))
            .sum(),
    }
}

// == Entry Size ==
/// Approximate size of one stored entry, including its internal key.
pub fn entry_bytes(internal_key: &str, entry: &Entry) -> u64 {
    let dependencies: u64 = entry
        .depends_on
        .iter()
        .map(|dep| match dep {
            Selector::Plain(key) => string_bytes(key),
            Selector::Pattern(re) => string_bytes(re.as_str()),
        })
        .sum();
    let channel = entry.remote_channel.as_deref().map_or(0, string_bytes);

    string_bytes(internal_key)
        + string_bytes(&entry.logical_key)
        + value_bytes(&entry.value)
        + NUMBER_BYTES // created_at
        + NUMBER_BYTES // ttl
        + BOOL_BYTES // dirty
        + dependencies
        + channel
}

/// Approximate size of the whole entry map.
pub fn estimate_bytes(entries: &HashMap<String, Entry>) -> u64 {
    entries
        .iter()
        .map(|(internal_key, entry)| entry_bytes(internal_key, entry))
        .sum()
}

// == Format ==
/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KB {
        format!("{} b", bytes)
    } else if bytes < MB {
        format!("{:.3} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.3} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.3} GB", bytes as f64 / GB as f64)
    }
}
