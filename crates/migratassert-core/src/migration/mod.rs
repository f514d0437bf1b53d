//! Migration engine for converting v4.4.0 configurations to TC3
//!
//! Each v4.4.0 template block has its own mapper; [`transform_config`]
//! assembles their output into a TC3 template and collects every dropped
//! field along the way.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

pub mod annotations;
pub mod encoding;
pub mod provenance;
pub mod source;
pub mod statement;

use crate::document::{as_list, as_mapping};
use crate::lossiness::DroppedFields;
use crate::types::{Document, MigrationOptions, TransformResult};
use crate::Result;
use serde_json::Value;

pub use annotations::{annotation_name, map_annotations};
pub use encoding::{extract_taxon_id, map_node_encoding, map_transformations};
pub use provenance::{map_provenance, parse_publication_curie};
pub use source::{file_kind, map_reindexing, map_source, FileKind};
pub use statement::{map_predicate, map_statement};

/// Value of `syntax` in every migrated template
pub const TARGET_SYNTAX: &str = "TC3";

/// Template keys that are consumed by a block mapper
///
/// Section keys outside this set are copied through untouched.
pub const TRANSFORMABLE_KEYS: &[&str] = &["location", "triple", "provenance", "attributes", "reindexing"];

/// Transform a v4.4.0 configuration into a TC3 configuration
///
/// `file_stem` is the stem of the file being migrated and is used to fill
/// in a default local data path. A missing `template` key is treated as an
/// empty template.
///
/// # Errors
///
/// Fails when the document (or one of its blocks) has the wrong shape, or
/// a taxon CURIE does not end in an integer.
///
/// # Example
///
/// ```
/// use migratassert_core::{transform_config, MigrationOptions};
/// use serde_json::json;
///
/// let v440 = json!({
///     "template": {
///         "triple": {"triple_predicate": "biolink:treats"},
///         "attributes": {"notes": "hand curated"}
///     }
/// });
/// let result = transform_config(&v440, None, &MigrationOptions::default()).unwrap();
/// assert_eq!(result.config["template"]["syntax"], "TC3");
/// assert_eq!(result.config["template"]["statement"]["predicate"], "treats");
/// assert!(result.dropped_fields.is_empty());
/// ```
pub fn transform_config(
    config: &Value,
    file_stem: Option<&str>,
    options: &MigrationOptions,
) -> Result<TransformResult> {
    let root = as_mapping(config, "$")?;
    let empty = Value::Object(Document::new());
    let template = as_mapping(root.get("template").unwrap_or(&empty), "template")?;

    let mut dropped = DroppedFields::new();
    let mut target = Document::new();
    target.insert("syntax".to_string(), Value::String(TARGET_SYNTAX.to_string()));
    map_blocks(template, file_stem, options, &mut target, &mut dropped)?;

    if let Some(sections) = template.get("sections") {
        let sections = as_list(sections, "sections")?;
        let mut mapped_sections = Vec::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            let section = as_mapping(section, &format!("sections[{index}]"))?;
            mapped_sections.push(Value::Object(map_section(section, options, &mut dropped)?));
        }
        target.insert("sections".to_string(), Value::Array(mapped_sections));
    }

    log::debug!(
        "Transformed template with {} dropped field(s)",
        dropped.len()
    );

    let mut document = Document::new();
    document.insert("template".to_string(), Value::Object(target));
    Ok(TransformResult {
        config: Value::Object(document),
        dropped_fields: dropped,
    })
}

/// Apply the four block mappers to a template-shaped document
///
/// Keys are written in the fixed order source, statement, provenance,
/// annotations.
fn map_blocks(
    template: &Document,
    file_stem: Option<&str>,
    options: &MigrationOptions,
    target: &mut Document,
    dropped: &mut DroppedFields,
) -> Result<()> {
    if let Some(location) = template.get("location") {
        let result = map_source(location, template.get("reindexing"), file_stem)?;
        target.insert("source".to_string(), result.mapped);
        dropped.append(result.dropped);
    }

    if let Some(triple) = template.get("triple") {
        let result = map_statement(triple, options)?;
        target.insert("statement".to_string(), result.mapped);
        dropped.append(result.dropped);
    }

    if let Some(provenance) = template.get("provenance") {
        let result = map_provenance(provenance)?;
        target.insert("provenance".to_string(), result.mapped);
        dropped.append(result.dropped);
    }

    if let Some(attributes) = template.get("attributes") {
        let result = map_annotations(attributes, options)?;
        target.insert("annotations".to_string(), result.mapped);
        dropped.append(result.dropped);
    }

    Ok(())
}

/// Map one section: the block mappers first, then passthrough keys
fn map_section(
    section: &Document,
    options: &MigrationOptions,
    dropped: &mut DroppedFields,
) -> Result<Document> {
    let mut target = Document::new();
    map_blocks(section, None, options, &mut target, dropped)?;

    for (key, value) in section {
        if !TRANSFORMABLE_KEYS.contains(&key.as_str()) {
            target.insert(key.clone(), value.clone());
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnnotationLayout;
    use serde_json::json;

    fn transform(config: Value) -> TransformResult {
        transform_config(&config, None, &MigrationOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_template() {
        let result = transform(json!({"template": {}}));
        assert_eq!(result.config, json!({"template": {"syntax": "TC3"}}));
        assert!(result.dropped_fields.is_empty());
    }

    #[test]
    fn test_missing_template_is_empty() {
        let result = transform(json!({}));
        assert_eq!(result.config, json!({"template": {"syntax": "TC3"}}));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = transform_config(&json!(["template"]), None, &MigrationOptions::default()).unwrap_err();
        assert_eq!(err.path(), Some("$"));
    }

    #[test]
    fn test_transforms_all_blocks() {
        let result = transform(json!({
            "template": {
                "location": {
                    "posix_filepath": "/data/file.csv",
                    "download_hyperparameters": {"file_extension": "csv"}
                },
                "triple": {
                    "triple_subject": {"encoding_method": "column", "value_for_encoding": "A"},
                    "triple_predicate": {"value_for_encoding": "biolink:related_to"},
                    "triple_object": {"encoding_method": "column", "value_for_encoding": "B"}
                },
                "provenance": {"publication": "PMC:12345", "config_curator_name": "Test User"},
                "attributes": {"p_value": {"encoding_method": "column", "value_for_encoding": "pval"}},
                "reindexing": [{"column": "pval", "comparison": "lt", "value_for_comparison": 0.05}]
            }
        }));
        let tc3 = result.template();
        assert_eq!(tc3["syntax"], "TC3");
        assert_eq!(tc3["source"]["local"], "/data/file.csv");
        assert_eq!(tc3["source"]["kind"], "text");
        assert_eq!(tc3["source"]["reindex"][0]["comparator"], 0.05);
        assert_eq!(tc3["statement"]["subject"]["encoding"], "A");
        assert_eq!(tc3["statement"]["predicate"], "related_to");
        assert_eq!(tc3["provenance"]["repo"], "PMC");
        assert_eq!(tc3["annotations"][0]["annotation"], "p value");
        assert_eq!(tc3["annotations"][0]["method"], "column");
    }

    #[test]
    fn test_output_key_order_is_fixed() {
        let result = transform(json!({
            "template": {
                "sections": [],
                "attributes": {"notes": "n"},
                "provenance": {"publication": "PMID:1"},
                "triple": {"triple_predicate": "biolink:treats"},
                "location": {"posix_filepath": "/x.csv"}
            }
        }));
        let keys: Vec<_> = result.template().as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            ["syntax", "source", "statement", "provenance", "annotations", "sections"]
        );
    }

    #[test]
    fn test_keyed_annotations_option() {
        let options = MigrationOptions {
            annotations: AnnotationLayout::Keyed,
            ..MigrationOptions::default()
        };
        let config = json!({
            "template": {"attributes": {"p_value": {"encoding_method": "column", "value_for_encoding": "pval"}}}
        });
        let result = transform_config(&config, None, &options).unwrap();
        assert_eq!(result.template()["annotations"]["p_value"]["method"], "column");
    }

    #[test]
    fn test_file_stem_only_applies_to_top_level() {
        let config = json!({
            "template": {
                "location": {"download_hyperparameters": {"file_extension": "xlsx"}},
                "sections": [{"location": {"where_to_download_data_from": "https://x"}}]
            }
        });
        let result = transform_config(&config, Some("cfg"), &MigrationOptions::default()).unwrap();
        assert_eq!(result.template()["source"]["local"], "./DATALAKE/cfg.xlsx");
        assert!(result.template()["sections"][0]["source"].get("local").is_none());
    }

    #[test]
    fn test_sections_are_transformed() {
        let result = transform(json!({
            "template": {
                "triple": {"triple_predicate": {"value_for_encoding": "biolink:related_to"}},
                "sections": [{
                    "triple": {
                        "triple_subject": {
                            "encoding_method": "column",
                            "value_for_encoding": "gene",
                            "mapping_hyperparameters": {
                                "in_this_organism": "NCBITaxon:9606",
                                "classes_to_prioritize": ["biolink:Gene"],
                                "how_to_fill_column": "forward"
                            }
                        },
                        "triple_predicate": {"value_for_encoding": "biolink:treats"}
                    },
                    "attributes": {"p_value": {"encoding_method": "column", "value_for_encoding": "pval"}},
                    "location": {"posix_filepath": "/s.csv"},
                    "reindexing": [{"column": "c", "comparison": "eq", "value_for_comparison": 1}],
                    "notes": "kept as-is"
                }]
            }
        }));
        let section = &result.template()["sections"][0];
        assert_eq!(section["statement"]["subject"]["taxon"], 9606);
        assert_eq!(section["statement"]["subject"]["prioritize"], json!(["Gene"]));
        assert_eq!(section["statement"]["predicate"], "treats");
        assert_eq!(section["annotations"][0]["encoding"], "pval");
        assert_eq!(section["source"]["reindex"][0]["comparator"], 1);
        assert_eq!(section["notes"], "kept as-is");
        for key in TRANSFORMABLE_KEYS {
            assert!(section.get(*key).is_none(), "{key} should not be copied");
        }
        assert_eq!(
            result.dropped_fields.as_slice(),
            ["triple.subject.how_to_fill_column"]
        );
    }

    #[test]
    fn test_section_passthrough_keys_follow_mapped_keys() {
        let result = transform(json!({
            "template": {
                "sections": [{"extra": 1, "triple": {"triple_predicate": "x"}}]
            }
        }));
        let keys: Vec<_> = result.template()["sections"][0]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["statement", "extra"]);
    }

    #[test]
    fn test_section_must_be_mapping() {
        let config = json!({"template": {"sections": ["oops"]}});
        let err = transform_config(&config, None, &MigrationOptions::default()).unwrap_err();
        assert_eq!(err.path(), Some("sections[0]"));
    }

    #[test]
    fn test_dropped_fields_follow_block_order() {
        let result = transform(json!({
            "template": {
                "attributes": {"p_value": {"mapping_hyperparameters": {"how_to_fill_column": "x"}}},
                "triple": {"triple_object": {"mapping_hyperparameters": {"bogus": 1}}}
            }
        }));
        assert_eq!(
            result.dropped_fields.as_slice(),
            ["triple.object.bogus", "attributes.p_value.how_to_fill_column"]
        );
    }
}
