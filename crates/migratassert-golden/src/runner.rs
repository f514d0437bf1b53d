//! Golden test runner for executing migration cases
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::{
    corpus::{CorpusManager, TestCase},
    diff::DiffEngine,
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use migratassert_core::transform_config;
use regex::Regex;
use std::fs;
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    /// Name of the test
    pub name: String,

    /// Whether the test passed
    pub passed: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,

    /// Whether expected.yaml was rewritten
    pub updated: bool,
}

impl TestResult {
    /// Print the test result
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Expected output updated".yellow());
        }
    }
}

/// Outcome of executing one case, before timing is attached
struct Outcome {
    passed: bool,
    error: Option<String>,
    diff: Option<String>,
    updated: bool,
}

impl Outcome {
    fn pass() -> Self {
        Self {
            passed: true,
            error: None,
            diff: None,
            updated: false,
        }
    }

    fn fail(error: impl Into<String>, diff: Option<String>) -> Self {
        Self {
            passed: false,
            error: Some(error.into()),
            diff,
            updated: false,
        }
    }
}

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
}

impl GoldenTestRunner {
    /// Create a new test runner
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        Self {
            config,
            corpus_manager,
        }
    }

    /// Run a single test by `category/name`
    pub fn run_test(&self, test_name: &str) -> Result<TestResult> {
        let test_case = self
            .corpus_manager
            .load_test_case(&self.config.corpus_dir.join(test_name))?;
        let result = self.run_case(&test_case);

        if self.config.verbose {
            result.print(true);
        }

        if result.passed {
            Ok(result)
        } else {
            Err(GoldenError::TestFailed(format!(
                "Test '{}' failed: {}",
                test_name,
                result.error.as_deref().unwrap_or("Unknown error")
            )))
        }
    }

    /// Run a batch of tests whose id contains `pattern` (`*` for all)
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let tests = self.corpus_manager.discover_tests()?;

        let filtered_tests: Vec<_> = if pattern == "*" {
            tests
        } else {
            tests.into_iter().filter(|t| t.id().contains(pattern)).collect()
        };

        if filtered_tests.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No tests found matching pattern '{}'",
                pattern
            )));
        }

        println!("Running {} tests...\n", filtered_tests.len());

        let mut results = Vec::with_capacity(filtered_tests.len());
        for test_case in &filtered_tests {
            let result = self.run_case(test_case);
            result.print(self.config.verbose);
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.passed).count();
        let passed = results.len() - failed;

        println!("\n{}", "=== Test Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            passed.to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} test(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    /// List all available tests
    pub fn list_tests(&self) -> Result<Vec<String>> {
        let tests = self.corpus_manager.discover_tests()?;
        Ok(tests.iter().map(TestCase::id).collect())
    }

    fn run_case(&self, test_case: &TestCase) -> TestResult {
        let start = Instant::now();
        let outcome = self
            .execute_test(test_case)
            .unwrap_or_else(|e| Outcome::fail(e.to_string(), None));

        TestResult {
            name: test_case.id(),
            passed: outcome.passed,
            error: outcome.error,
            diff: outcome.diff,
            duration_ms: start.elapsed().as_millis() as u64,
            updated: outcome.updated,
        }
    }

    /// Execute a single test case
    fn execute_test(&self, test_case: &TestCase) -> Result<Outcome> {
        let spec = &test_case.spec;
        if !spec.metadata.enabled {
            return Ok(Outcome::pass());
        }

        let migrated = transform_config(&test_case.input, spec.file_stem.as_deref(), &spec.options);
        let expectations = &spec.expectations;

        let result = match (migrated, expectations.should_succeed) {
            (Ok(result), true) => result,
            (Ok(_), false) => return Ok(Outcome::fail("Migration succeeded but was expected to fail", None)),
            (Err(e), true) => return Ok(Outcome::fail(format!("Migration failed: {}", e), None)),
            (Err(e), false) => return self.check_error(&e.to_string(), expectations.error_pattern.as_deref()),
        };

        if result.dropped_fields.as_slice() != expectations.dropped_fields.as_slice() {
            return Ok(Outcome::fail(
                format!(
                    "Dropped fields differ: expected {:?}, got {:?}",
                    expectations.dropped_fields,
                    result.dropped_fields.as_slice()
                ),
                None,
            ));
        }

        let Some(expected) = &test_case.expected else {
            if self.config.update_expected {
                self.write_expected(test_case, &result.config)?;
                return Ok(Outcome {
                    updated: true,
                    ..Outcome::pass()
                });
            }
            return Err(GoldenError::Mismatch(format!(
                "'{}' has no expected.yaml. Run with UPDATE_GOLDEN=1 to create it.",
                test_case.id()
            )));
        };

        let mut diff_engine = DiffEngine::new(self.config.diff_options.clone());
        for volatile in &expectations.volatile_fields {
            diff_engine.add_volatile_pattern(&volatile.path, &volatile.pattern)?;
        }

        let diff_result = diff_engine.compare(expected, &result.config);
        if diff_result.matches {
            Ok(Outcome::pass())
        } else if self.config.update_expected {
            self.write_expected(test_case, &result.config)?;
            Ok(Outcome {
                passed: true,
                error: None,
                diff: Some(diff_result.diff_output),
                updated: true,
            })
        } else {
            Ok(Outcome::fail(
                format!("Output differs at {}", diff_result.differing_paths.join(", ")),
                Some(diff_result.diff_output),
            ))
        }
    }

    fn check_error(&self, message: &str, pattern: Option<&str>) -> Result<Outcome> {
        let Some(pattern) = pattern else {
            return Ok(Outcome::pass());
        };
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid error pattern: {}", e)))?;
        if regex.is_match(message) {
            Ok(Outcome::pass())
        } else {
            Ok(Outcome::fail(
                format!("Error '{}' does not match pattern '{}'", message, pattern),
                None,
            ))
        }
    }

    fn write_expected(&self, test_case: &TestCase, value: &serde_json::Value) -> Result<()> {
        fs::write(test_case.expected_path(), serde_yaml::to_string(value)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CaseSpec, TestExpectations, VolatileFieldSpec};
    use crate::DiffOptions;
    use serde_json::json;
    use tempfile::TempDir;

    fn runner(dir: &TempDir, update_expected: bool) -> GoldenTestRunner {
        GoldenTestRunner::new(GoldenConfig {
            corpus_dir: dir.path().to_path_buf(),
            update_expected,
            diff_options: DiffOptions {
                colored: false,
                ..Default::default()
            },
            verbose: false,
        })
    }

    fn manager(dir: &TempDir) -> CorpusManager {
        CorpusManager::new(dir.path())
    }

    #[test]
    fn test_passing_case() {
        let dir = TempDir::new().unwrap();
        let input = json!({"template": {"triple": {"triple_predicate": "biolink:treats"}}});
        let expected = json!({"template": {"syntax": "TC3", "statement": {"predicate": "treats"}}});
        manager(&dir)
            .create_case("basic/predicate", &CaseSpec::default(), &input, Some(&expected))
            .unwrap();

        let result = runner(&dir, false).run_test("basic/predicate").unwrap();
        assert!(result.passed);
        assert_eq!(result.name, "basic/predicate");
    }

    #[test]
    fn test_mismatch_fails_with_diff() {
        let dir = TempDir::new().unwrap();
        let input = json!({"template": {"triple": {"triple_predicate": "biolink:treats"}}});
        let expected = json!({"template": {"syntax": "TC3", "statement": {"predicate": "causes"}}});
        manager(&dir)
            .create_case("basic/wrong", &CaseSpec::default(), &input, Some(&expected))
            .unwrap();

        let err = runner(&dir, false).run_test("basic/wrong").unwrap_err();
        assert!(err.to_string().contains("template.statement.predicate"));
    }

    #[test]
    fn test_block_order_is_checked() {
        let dir = TempDir::new().unwrap();
        let input = json!({
            "template": {
                "provenance": {"publication": "PMC:1"},
                "triple": {"triple_predicate": "biolink:treats"}
            }
        });
        let expected = json!({
            "template": {
                "syntax": "TC3",
                "provenance": {"repo": "PMC", "publication": "1"},
                "statement": {"predicate": "treats"}
            }
        });
        manager(&dir)
            .create_case("basic/order", &CaseSpec::default(), &input, Some(&expected))
            .unwrap();

        let err = runner(&dir, false).run_test("basic/order").unwrap_err();
        assert!(err.to_string().contains("template (key order differs)"));
    }

    #[test]
    fn test_dropped_fields_are_checked() {
        let dir = TempDir::new().unwrap();
        let input = json!({
            "template": {"triple": {"triple_subject": {"mapping_hyperparameters": {"how_to_fill_column": "x"}}}}
        });
        let expected = json!({"template": {"syntax": "TC3", "statement": {"subject": {}}}});
        manager(&dir)
            .create_case("drops/unreported", &CaseSpec::default(), &input, Some(&expected))
            .unwrap();
        assert!(runner(&dir, false).run_test("drops/unreported").is_err());

        let spec = CaseSpec {
            expectations: TestExpectations {
                dropped_fields: vec!["triple.subject.how_to_fill_column".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        manager(&dir)
            .create_case("drops/reported", &spec, &input, Some(&expected))
            .unwrap();
        assert!(runner(&dir, false).run_test("drops/reported").is_ok());
    }

    #[test]
    fn test_expected_failure() {
        let dir = TempDir::new().unwrap();
        let input = json!({
            "template": {"triple": {"triple_subject": {"mapping_hyperparameters": {"in_this_organism": "NCBITaxon:x"}}}}
        });
        let spec = CaseSpec {
            expectations: TestExpectations {
                should_succeed: false,
                error_pattern: Some("Invalid taxon identifier 'NCBITaxon:x'".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        manager(&dir).create_case("errors/taxon", &spec, &input, None).unwrap();
        assert!(runner(&dir, false).run_test("errors/taxon").is_ok());
    }

    #[test]
    fn test_volatile_synthesized_date() {
        let dir = TempDir::new().unwrap();
        let input = json!({"template": {"provenance": {"config_curator_name": "Jane"}}});
        let expected = json!({
            "template": {
                "syntax": "TC3",
                "provenance": {"contributors": [{"kind": "curation", "name": "Jane", "date": "01 JAN 2000"}]}
            }
        });
        let spec = CaseSpec {
            expectations: TestExpectations {
                volatile_fields: vec![VolatileFieldSpec {
                    path: "template.provenance.contributors.date".to_string(),
                    pattern: r"^\d{2} [A-Z]{3} \d{4}$".to_string(),
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        manager(&dir)
            .create_case("provenance/today", &spec, &input, Some(&expected))
            .unwrap();
        assert!(runner(&dir, false).run_test("provenance/today").is_ok());
    }

    #[test]
    fn test_update_writes_expected() {
        let dir = TempDir::new().unwrap();
        let input = json!({"template": {}});
        let case_dir = manager(&dir)
            .create_case("new/empty", &CaseSpec::default(), &input, None)
            .unwrap();

        let result = runner(&dir, true).run_test("new/empty").unwrap();
        assert!(result.updated);
        let written: serde_json::Value =
            serde_yaml::from_str(&fs::read_to_string(case_dir.join("expected.yaml")).unwrap()).unwrap();
        assert_eq!(written, json!({"template": {"syntax": "TC3"}}));
    }

    #[test]
    fn test_batch_filters_by_pattern() {
        let dir = TempDir::new().unwrap();
        let input = json!({"template": {}});
        let expected = json!({"template": {"syntax": "TC3"}});
        for id in ["basic/a", "basic/b", "sections/c"] {
            manager(&dir)
                .create_case(id, &CaseSpec::default(), &input, Some(&expected))
                .unwrap();
        }

        let runner = runner(&dir, false);
        assert_eq!(runner.run_batch("basic").unwrap().len(), 2);
        assert_eq!(runner.run_batch("*").unwrap().len(), 3);
        assert!(runner.run_batch("missing").is_err());
        assert_eq!(runner.list_tests().unwrap(), ["basic/a", "basic/b", "sections/c"]);
    }
}
