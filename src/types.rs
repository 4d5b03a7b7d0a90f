//! Common types used throughout cron-refresh
//!
//! Shared type aliases plus the JSON truthiness rule the completion checks
//! rely on.

use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Ordered string map, used for query parameters so request URLs are stable
pub type StringMap = BTreeMap<String, String>;

// ============================================================================
// Truthiness
// ============================================================================

/// Whether a JSON value counts as "set" for completion checks.
///
/// `null`, `false`, zero, the empty string, the empty array and the empty
/// object are falsy; everything else is truthy.
pub fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    }
}

/// Truthiness of an optional field, where a missing field is falsy
pub fn field_truthy(body: &JsonValue, field: &str) -> bool {
    body.get(field).is_some_and(truthy)
}
