//! Map the `attributes` block to the TC3 `annotations` block
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use super::encoding::map_node_encoding;
use crate::document::as_mapping;
use crate::lossiness::DroppedFields;
use crate::types::{AnnotationLayout, Document, MapResult, MigrationOptions};
use crate::Result;
use serde_json::Value;

/// Attribute names whose TC3 annotation name is not a plain underscore swap
const ANNOTATION_NAMES: &[(&str, &str)] = &[
    ("p_value", "p value"),
    ("sample_size", "sample size"),
    ("multiple_testing_correction_method", "multiple testing correction method"),
    ("relationship_strength", "relationship strength"),
    ("assertion_method", "assertion method"),
    ("notes", "miscellaneous notes"),
];

/// Human-readable TC3 annotation name for a v4.4.0 attribute name
pub fn annotation_name(attribute: &str) -> String {
    ANNOTATION_NAMES
        .iter()
        .find(|(name, _)| *name == attribute)
        .map(|(_, human)| human.to_string())
        .unwrap_or_else(|| attribute.replace('_', " "))
}

/// Map v4.4.0 attributes to TC3 annotations in the requested layout
pub fn map_annotations(attributes: &Value, options: &MigrationOptions) -> Result<MapResult> {
    let attributes = as_mapping(attributes, "attributes")?;
    match options.annotations {
        AnnotationLayout::Tagged => map_tagged(attributes, options),
        AnnotationLayout::Keyed => map_keyed(attributes, options),
    }
}

fn map_tagged(attributes: &Document, options: &MigrationOptions) -> Result<MapResult> {
    let mut dropped = DroppedFields::new();
    let mut annotations = Vec::with_capacity(attributes.len());

    for (name, value) in attributes {
        let mut annotation = Document::new();
        annotation.insert("annotation".to_string(), Value::String(annotation_name(name)));

        if value.is_object() {
            let (mapped, encoding_dropped) =
                map_node_encoding(value, &format!("attributes.{name}."), options)?.into_parts();
            if let Value::Object(fields) = mapped {
                annotation.extend(fields);
            }
            dropped.append(encoding_dropped);
        } else {
            annotation.insert("method".to_string(), Value::String("value".to_string()));
            annotation.insert("encoding".to_string(), value.clone());
        }
        annotations.push(Value::Object(annotation));
    }

    Ok(MapResult::with_dropped(annotations, dropped))
}

fn map_keyed(attributes: &Document, options: &MigrationOptions) -> Result<MapResult> {
    let mut dropped = DroppedFields::new();
    let mut annotations = Document::new();

    for (name, value) in attributes {
        let mapped = if value.is_object() {
            let (mapped, encoding_dropped) =
                map_node_encoding(value, &format!("attributes.{name}."), options)?.into_parts();
            dropped.append(encoding_dropped);
            mapped
        } else {
            value.clone()
        };
        annotations.insert(name.clone(), mapped);
    }

    Ok(MapResult::with_dropped(annotations, dropped))
}
