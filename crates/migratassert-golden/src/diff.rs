//! Diff engine for comparing migrated documents
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::{GoldenError, Result};
use colored::*;
use regex::Regex;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Replacement written over volatile values before comparison
pub const MASK: &str = "***MASKED***";

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Tolerance for floating point comparison
    pub float_tolerance: f64,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            float_tolerance: 1e-9,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the values match
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    /// Paths that differ
    pub differing_paths: Vec<String>,
}

/// Engine for comparing YAML documents
pub struct DiffEngine {
    options: DiffOptions,
    volatile_patterns: Vec<(String, Regex)>,
}

impl DiffEngine {
    /// Create a new diff engine
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            volatile_patterns: Vec::new(),
        }
    }

    /// Add a volatile field pattern
    ///
    /// `path` is dotted; list elements along the way are all visited.
    pub fn add_volatile_pattern(&mut self, path: &str, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid regex pattern: {}", e)))?;

        self.volatile_patterns.push((path.to_string(), regex));
        Ok(())
    }

    /// Compare two documents
    pub fn compare(&self, expected: &Value, actual: &Value) -> DiffResult {
        let expected = self.mask_volatile_fields(expected);
        let actual = self.mask_volatile_fields(actual);

        if self.values_match(&expected, &actual) {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                differing_paths: Vec::new(),
            };
        }

        let mut differing_paths = Vec::new();
        self.collect_diff_paths(&expected, &actual, String::new(), &mut differing_paths);

        DiffResult {
            matches: false,
            diff_output: self.generate_diff_output(&expected, &actual),
            differing_paths,
        }
    }

    /// Check if two values match structurally
    ///
    /// Mapping key order and list order are both compared.
    fn values_match(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                exp.keys().eq(act.keys())
                    && exp.iter().all(|(key, exp_val)| {
                        act.get(key)
                            .is_some_and(|act_val| self.values_match(exp_val, act_val))
                    })
            }
            (Value::Array(exp), Value::Array(act)) => {
                exp.len() == act.len()
                    && exp
                        .iter()
                        .zip(act)
                        .all(|(exp_val, act_val)| self.values_match(exp_val, act_val))
            }
            (Value::Number(exp), Value::Number(act)) => {
                if exp.is_f64() || act.is_f64() {
                    match (exp.as_f64(), act.as_f64()) {
                        (Some(e), Some(a)) => (e - a).abs() <= self.options.float_tolerance,
                        _ => false,
                    }
                } else {
                    exp == act
                }
            }
            (exp, act) => exp == act,
        }
    }

    /// Generate a line diff of the YAML renderings
    fn generate_diff_output(&self, expected: &Value, actual: &Value) -> String {
        let expected_str = serde_yaml::to_string(expected).unwrap_or_default();
        let actual_str = serde_yaml::to_string(actual).unwrap_or_default();

        let text_diff = TextDiff::from_lines(&expected_str, &actual_str);
        let mut output = String::new();

        if self.options.colored {
            output.push_str(&"=== Diff Output ===\n".bold().to_string());
        } else {
            output.push_str("=== Diff Output ===\n");
        }

        for (line_count, change) in text_diff.iter_all_changes().enumerate() {
            if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                output.push_str("... (diff truncated) ...\n");
                break;
            }

            let line = match change.tag() {
                ChangeTag::Delete if self.options.colored => {
                    format!("{}{}", "-".red(), change.to_string().red())
                }
                ChangeTag::Delete => format!("-{}", change),
                ChangeTag::Insert if self.options.colored => {
                    format!("{}{}", "+".green(), change.to_string().green())
                }
                ChangeTag::Insert => format!("+{}", change),
                ChangeTag::Equal => format!(" {}", change),
            };
            output.push_str(&line);
        }

        output
    }

    /// Recursively collect paths that differ
    fn collect_diff_paths(&self, expected: &Value, actual: &Value, path: String, paths: &mut Vec<String>) {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                let all_keys: BTreeSet<_> = exp.keys().chain(act.keys()).collect();
                let same_keys = exp.len() == act.len() && exp.keys().all(|k| act.contains_key(k));
                if same_keys && !exp.keys().eq(act.keys()) {
                    let at = if path.is_empty() { "$" } else { path.as_str() };
                    paths.push(format!("{} (key order differs)", at));
                }

                for key in all_keys {
                    let new_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };

                    match (exp.get(key), act.get(key)) {
                        (Some(exp_val), Some(act_val)) => {
                            if !self.values_match(exp_val, act_val) {
                                self.collect_diff_paths(exp_val, act_val, new_path, paths);
                            }
                        }
                        (Some(_), None) => paths.push(format!("{} (missing in actual)", new_path)),
                        (None, Some(_)) => paths.push(format!("{} (extra in actual)", new_path)),
                        (None, None) => {}
                    }
                }
            }
            (Value::Array(exp), Value::Array(act)) => {
                for (i, (exp_val, act_val)) in exp.iter().zip(act.iter()).enumerate() {
                    if !self.values_match(exp_val, act_val) {
                        self.collect_diff_paths(exp_val, act_val, format!("{}[{}]", path, i), paths);
                    }
                }

                if exp.len() != act.len() {
                    paths.push(format!(
                        "{} (list length mismatch: {} vs {})",
                        path,
                        exp.len(),
                        act.len()
                    ));
                }
            }
            _ => {
                if !self.values_match(expected, actual) {
                    paths.push(path);
                }
            }
        }
    }

    /// Mask volatile fields in a value
    fn mask_volatile_fields(&self, value: &Value) -> Value {
        let mut masked = value.clone();

        for (path, pattern) in &self.volatile_patterns {
            let parts: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
            mask_field_recursive(&mut masked, &parts, pattern);
        }

        masked
    }
}

fn mask_field_recursive(value: &mut Value, path_parts: &[&str], pattern: &Regex) {
    let Some((first, rest)) = path_parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) => {
            let Some(field_value) = map.get_mut(*first) else {
                return;
            };
            if !rest.is_empty() {
                mask_field_recursive(field_value, rest, pattern);
            } else if let Value::String(s) = field_value {
                if pattern.is_match(s) {
                    *field_value = Value::String(MASK.to_string());
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                mask_field_recursive(item, path_parts, pattern);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> DiffEngine {
        DiffEngine::new(DiffOptions {
            colored: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_key_order_is_compared() {
        let expected = json!({"template": {"syntax": "TC3", "source": {"local": "/x"}}});
        let actual = json!({"template": {"source": {"local": "/x"}, "syntax": "TC3"}});
        let result = engine().compare(&expected, &actual);
        assert!(!result.matches);
        assert_eq!(result.differing_paths, ["template (key order differs)"]);

        assert!(engine().compare(&expected, &expected.clone()).matches);
    }

    #[test]
    fn test_list_order_matters() {
        let result = engine().compare(&json!({"rows": [1, 2]}), &json!({"rows": [2, 1]}));
        assert!(!result.matches);
        assert_eq!(result.differing_paths, ["rows[0]", "rows[1]"]);
    }

    #[test]
    fn test_number_kinds() {
        assert!(!engine().values_match(&json!(1), &json!("1")));
        assert!(engine().values_match(&json!(0.05), &json!(0.05)));
    }

    #[test]
    fn test_missing_and_extra_paths() {
        let expected = json!({"template": {"syntax": "TC3", "source": {}}});
        let actual = json!({"template": {"syntax": "TC3", "statement": {}}});
        let result = engine().compare(&expected, &actual);
        assert_eq!(
            result.differing_paths,
            [
                "template.source (missing in actual)",
                "template.statement (extra in actual)"
            ]
        );
        assert!(result.diff_output.contains("-  source: {}"));
    }

    #[test]
    fn test_volatile_date_masking_through_lists() {
        let mut engine = engine();
        engine
            .add_volatile_pattern("template.provenance.contributors.date", r"^\d{2} [A-Z]{3} \d{4}$")
            .unwrap();

        let expected = json!({"template": {"provenance": {"contributors": [{"date": "01 JAN 2025"}]}}});
        let actual = json!({"template": {"provenance": {"contributors": [{"date": "16 OCT 2026"}]}}});
        assert!(engine.compare(&expected, &actual).matches);

        let not_a_date = json!({"template": {"provenance": {"contributors": [{"date": "yesterday"}]}}});
        assert!(!engine.compare(&expected, &not_a_date).matches);
    }

    #[test]
    fn test_invalid_volatile_pattern() {
        assert!(engine().add_volatile_pattern("a", "(").is_err());
    }
}
