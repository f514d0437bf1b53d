//! Helpers for reading loosely typed YAML-derived documents
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::types::Document;
use crate::{Error, Result};
use serde_json::Value;

/// Namespace prefix removed from predicates and class names
pub const BIOLINK_PREFIX: &str = "biolink:";

/// Borrow `value` as a mapping, or fail with the field path
pub fn as_mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Document> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid_structure(path, "a mapping", value))
}

/// Borrow `value` as a list, or fail with the field path
pub fn as_list<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::invalid_structure(path, "a list", value))
}

/// Borrow `value` as a string, or fail with the field path
pub fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid_structure(path, "a string", value))
}

/// Look up an optional key, treating an explicit null as absent
pub fn non_null<'a>(doc: &'a Document, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|v| !v.is_null())
}

/// YAML truthiness: null, false, 0, "" and empty collections are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Remove a leading `biolink:` from a string
pub fn strip_biolink(s: &str) -> &str {
    s.strip_prefix(BIOLINK_PREFIX).unwrap_or(s)
}

/// Strip `biolink:` from a string, or from each string of a list
///
/// Other values are returned unchanged.
pub fn strip_biolink_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_biolink(s).to_string()),
        Value::Array(items) => Value::Array(items.iter().map(strip_biolink_value).collect()),
        other => other.clone(),
    }
}
