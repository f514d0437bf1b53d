//! Core types shared by the block mappers
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::lossiness::DroppedFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An ordered mapping from key to value
pub type Document = Map<String, Value>;

/// Result of mapping one block: the target value plus the source fields
/// that had no destination
#[derive(Debug, Clone, PartialEq)]
pub struct MapResult {
    pub mapped: Value,
    pub dropped: DroppedFields,
}

impl MapResult {
    /// A result with nothing dropped
    pub fn new(mapped: impl Into<Value>) -> Self {
        Self {
            mapped: mapped.into(),
            dropped: DroppedFields::new(),
        }
    }

    pub fn with_dropped(mapped: impl Into<Value>, dropped: DroppedFields) -> Self {
        Self {
            mapped: mapped.into(),
            dropped,
        }
    }

    pub fn into_parts(self) -> (Value, DroppedFields) {
        (self.mapped, self.dropped)
    }
}

/// Result of transforming a whole configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    /// The TC3 document, `{template: {...}}`
    pub config: Value,
    /// Dropped-field paths in block order
    pub dropped_fields: DroppedFields,
}

impl TransformResult {
    /// The target template block
    pub fn template(&self) -> &Value {
        &self.config["template"]
    }
}

/// Target shape of the annotations block
///
/// TC3 moved from a mapping keyed by attribute name to a list of tagged
/// annotation objects; both are supported and chosen per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLayout {
    /// `[{annotation: "p value", method: ..., encoding: ...}, ...]`
    #[default]
    Tagged,
    /// `{p_value: {method: ..., encoding: ...}, ...}`
    Keyed,
}

impl fmt::Display for AnnotationLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationLayout::Tagged => write!(f, "tagged"),
            AnnotationLayout::Keyed => write!(f, "keyed"),
        }
    }
}

impl FromStr for AnnotationLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tagged" | "list" => Ok(AnnotationLayout::Tagged),
            "keyed" | "map" => Ok(AnnotationLayout::Keyed),
            other => Err(format!("unknown annotation layout '{other}' (expected tagged or keyed)")),
        }
    }
}

/// Knobs that select between the behaviors TC3 went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationOptions {
    /// Shape of the annotations block
    pub annotations: AnnotationLayout,
    /// Strip `biolink:` from `prioritize` / `avoid` class names
    pub strip_class_prefixes: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            annotations: AnnotationLayout::Tagged,
            strip_class_prefixes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_parse_and_display() {
        assert_eq!("tagged".parse::<AnnotationLayout>(), Ok(AnnotationLayout::Tagged));
        assert_eq!("MAP".parse::<AnnotationLayout>(), Ok(AnnotationLayout::Keyed));
        assert!("tree".parse::<AnnotationLayout>().is_err());
        assert_eq!(AnnotationLayout::Keyed.to_string(), "keyed");
    }

    #[test]
    fn test_options_defaults() {
        let options = MigrationOptions::default();
        assert_eq!(options.annotations, AnnotationLayout::Tagged);
        assert!(options.strip_class_prefixes);

        let partial: MigrationOptions = serde_json::from_value(json!({"annotations": "keyed"})).unwrap();
        assert_eq!(partial.annotations, AnnotationLayout::Keyed);
        assert!(partial.strip_class_prefixes);
    }

    #[test]
    fn test_map_result_parts() {
        let result = MapResult::new(json!({"url": "x"}));
        let (mapped, dropped) = result.into_parts();
        assert_eq!(mapped["url"], "x");
        assert!(dropped.is_empty());
    }
}
