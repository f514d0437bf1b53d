//! NodeEncoding mapping, shared by the statement and annotations mappers
//!
//! A v4.4.0 encoding describes how one value is produced (`encoding_method`,
//! `value_for_encoding`) and post-processed (`mapping_hyperparameters`,
//! `math_module_transformations`). TC3 flattens the hyperparameters into
//! the encoding itself under shorter names.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::document::{as_mapping, is_truthy, strip_biolink_value};
use crate::lossiness::DroppedFields;
use crate::types::{Document, MapResult, MigrationOptions};
use crate::{Error, Result};
use serde_json::Value;

/// Hyperparameter that v4.4.0 accepted but TC3 has no equivalent for
pub const ALWAYS_DROPPED_HYPERPARAMETER: &str = "how_to_fill_column";

/// `mapping_hyperparameters` key to TC3 encoding key
const HYPERPARAMETER_RENAMES: &[(&str, &str)] = &[
    ("in_this_organism", "taxon"),
    ("classes_to_prioritize", "prioritize"),
    ("classes_to_avoid", "avoid"),
    ("prefix", "prefix"),
    ("suffix", "suffix"),
    ("substrings_to_remove", "remove"),
    ("regular_expressions", "regex"),
    ("explode_by_delimiter", "explode_by"),
];

/// TC3 name for a hyperparameter, `None` if it has no destination
pub fn hyperparameter_target(key: &str) -> Option<&'static str> {
    if key == ALWAYS_DROPPED_HYPERPARAMETER {
        return None;
    }
    HYPERPARAMETER_RENAMES
        .iter()
        .find(|(source, _)| *source == key)
        .map(|(_, target)| *target)
}

/// Extract the integer id from a taxon CURIE such as `NCBITaxon:9606`
///
/// Everything after the first `:` must parse as an integer. A bare
/// integer string is accepted as-is.
pub fn extract_taxon_id(curie: &str) -> Result<i64> {
    let local = curie.split_once(':').map_or(curie, |(_, rest)| rest);
    local.trim().parse::<i64>().map_err(|source| Error::InvalidTaxon {
        value: curie.to_string(),
        source,
    })
}

fn map_taxon(value: &Value, path: &str) -> Result<Value> {
    match value {
        Value::String(curie) => Ok(Value::from(extract_taxon_id(curie)?)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        other => Err(Error::invalid_structure(path, "a taxon CURIE or integer", other)),
    }
}

/// Normalize `math_module_transformations` into TC3 `transformations`
///
/// Accepts a single transformation or a list of them. Entries whose
/// `attribute` is falsy are skipped.
pub fn map_transformations(math_module: Option<&Value>) -> Result<Vec<Value>> {
    let entries: Vec<&Value> = match math_module {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    };

    let mut transformations = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = as_mapping(entry, "math_module_transformations")?;
        let function = match entry.get("attribute") {
            Some(attribute) if is_truthy(attribute) => attribute.clone(),
            _ => continue,
        };
        let arguments = match entry.get("arguments") {
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(arguments) => arguments.clone(),
        };

        let mut transformation = Document::new();
        transformation.insert("function".to_string(), function);
        transformation.insert("arguments".to_string(), arguments);
        transformations.push(Value::Object(transformation));
    }
    Ok(transformations)
}

/// Map one encoding document to its TC3 shape
///
/// `field_prefix` roots the dropped-field paths, e.g. `"triple.subject."`.
pub fn map_node_encoding(
    encoding: &Value,
    field_prefix: &str,
    options: &MigrationOptions,
) -> Result<MapResult> {
    let context = field_prefix.trim_end_matches('.');
    let encoding = as_mapping(encoding, context)?;
    let mut dropped = DroppedFields::new();
    let mut mapped = Document::new();

    if let Some(method) = encoding.get("encoding_method") {
        mapped.insert("method".to_string(), method.clone());
    }
    if let Some(value) = encoding.get("value_for_encoding") {
        mapped.insert("encoding".to_string(), value.clone());
    }

    match encoding.get("mapping_hyperparameters") {
        None | Some(Value::Null) => {}
        Some(hyper) => {
            let hyper = as_mapping(hyper, &format!("{field_prefix}mapping_hyperparameters"))?;
            for (key, value) in hyper {
                let Some(target) = hyperparameter_target(key) else {
                    dropped.record(field_prefix, key);
                    continue;
                };
                let value = match target {
                    "taxon" => map_taxon(value, &format!("{field_prefix}{key}"))?,
                    "prioritize" | "avoid" if options.strip_class_prefixes => strip_biolink_value(value),
                    _ => value.clone(),
                };
                mapped.insert(target.to_string(), value);
            }
        }
    }

    let transformations = map_transformations(encoding.get("math_module_transformations"))?;
    if !transformations.is_empty() {
        mapped.insert("transformations".to_string(), Value::Array(transformations));
    }

    Ok(MapResult::with_dropped(mapped, dropped))
}
