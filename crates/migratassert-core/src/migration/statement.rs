//! Map the `triple` block to the TC3 `statement` block
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use super::encoding::map_node_encoding;
use crate::document::{as_mapping, strip_biolink};
use crate::lossiness::DroppedFields;
use crate::types::{Document, MapResult, MigrationOptions};
use crate::Result;
use serde_json::Value;

/// Resolve the predicate to a plain value with any `biolink:` removed
///
/// A nested encoding contributes its `value_for_encoding` (empty string
/// when absent); a scalar is used directly.
pub fn map_predicate(predicate: &Value) -> Value {
    let value = match predicate {
        Value::Object(encoding) => encoding
            .get("value_for_encoding")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
        scalar => scalar.clone(),
    };

    match value {
        Value::String(s) => Value::String(strip_biolink(&s).to_string()),
        other => other,
    }
}

/// Map a v4.4.0 triple to a TC3 statement
pub fn map_statement(triple: &Value, options: &MigrationOptions) -> Result<MapResult> {
    let triple = as_mapping(triple, "triple")?;
    let mut dropped = DroppedFields::new();
    let mut statement = Document::new();

    if let Some(subject) = triple.get("triple_subject") {
        let (mapped, subject_dropped) =
            map_node_encoding(subject, "triple.subject.", options)?.into_parts();
        statement.insert("subject".to_string(), mapped);
        dropped.append(subject_dropped);
    }

    if let Some(predicate) = triple.get("triple_predicate") {
        statement.insert("predicate".to_string(), map_predicate(predicate));
    }

    if let Some(object) = triple.get("triple_object") {
        let (mapped, object_dropped) =
            map_node_encoding(object, "triple.object.", options)?.into_parts();
        statement.insert("object".to_string(), mapped);
        dropped.append(object_dropped);
    }

    Ok(MapResult::with_dropped(statement, dropped))
}
