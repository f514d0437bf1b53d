//! Test corpus management for golden tests
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::{GoldenError, Result};
use migratassert_core::MigrationOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File that marks a directory as a golden case
pub const CASE_FILE: &str = "case.yaml";
/// v4.4.0 input document
pub const INPUT_FILE: &str = "input.yaml";
/// Expected TC3 document
pub const EXPECTED_FILE: &str = "expected.yaml";

/// Contents of a `case.yaml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseSpec {
    /// Stem passed to the transform for default local paths
    pub file_stem: Option<String>,

    /// Migration options for this case
    pub options: MigrationOptions,

    /// Expected behavior configuration
    pub expectations: TestExpectations,

    /// Test metadata
    pub metadata: TestMetadata,
}

/// Expected behavior for a test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestExpectations {
    /// Whether the migration should succeed
    pub should_succeed: bool,

    /// Regex the error message must match when `should_succeed` is false
    pub error_pattern: Option<String>,

    /// Exact dropped-field list, in order
    pub dropped_fields: Vec<String>,

    /// Fields whose values change from run to run
    pub volatile_fields: Vec<VolatileFieldSpec>,
}

impl Default for TestExpectations {
    fn default() -> Self {
        Self {
            should_succeed: true,
            error_pattern: None,
            dropped_fields: Vec::new(),
            volatile_fields: Vec::new(),
        }
    }
}

/// Specification for a volatile field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatileFieldSpec {
    pub path: String,
    pub pattern: String,
}

/// Metadata about a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadata {
    /// Description of what this tests
    pub description: String,

    /// Tags for categorization
    pub tags: Vec<String>,

    /// Whether this test is enabled
    pub enabled: bool,

    /// Priority level (lower = higher priority)
    pub priority: u32,
}

impl Default for TestMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            tags: Vec::new(),
            enabled: true,
            priority: 100,
        }
    }
}

/// A loaded golden case
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Directory name of the case
    pub name: String,

    /// Corpus-relative parent directory, e.g. `sections`
    pub category: String,

    /// Case directory
    pub dir: PathBuf,

    /// Parsed `case.yaml`
    pub spec: CaseSpec,

    /// Parsed `input.yaml`
    pub input: Value,

    /// Parsed `expected.yaml`, absent for failing cases and new cases
    pub expected: Option<Value>,
}

impl TestCase {
    /// `category/name`, as accepted by [`GoldenTestRunner::run_test`](crate::GoldenTestRunner::run_test)
    pub fn id(&self) -> String {
        if self.category.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.category, self.name)
        }
    }

    pub fn expected_path(&self) -> PathBuf {
        self.dir.join(EXPECTED_FILE)
    }
}

/// Manages the test corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    /// Create a new corpus manager
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Discover all test cases in the corpus
    pub fn discover_tests(&self) -> Result<Vec<TestCase>> {
        let mut tests = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(tests);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.file_name() == Some(std::ffi::OsStr::new(CASE_FILE)) {
                if let Some(dir) = path.parent() {
                    match self.load_test_case(dir) {
                        Ok(test_case) => tests.push(test_case),
                        Err(e) => {
                            eprintln!("Warning: Failed to load test case {:?}: {}", dir, e);
                        }
                    }
                }
            }
        }

        tests.sort_by_key(|t| t.spec.metadata.priority);
        Ok(tests)
    }

    /// Load the case stored in `dir`
    pub fn load_test_case(&self, dir: &Path) -> Result<TestCase> {
        let spec: CaseSpec = read_yaml(&dir.join(CASE_FILE))?;
        let input = read_yaml(&dir.join(INPUT_FILE))?;

        let expected_path = dir.join(EXPECTED_FILE);
        let expected = if expected_path.exists() {
            Some(read_yaml(&expected_path)?)
        } else {
            None
        };

        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| GoldenError::CorpusError(format!("Invalid case directory: {:?}", dir)))?
            .to_string();
        let category = dir
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.corpus_dir).ok())
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        Ok(TestCase {
            name,
            category,
            dir: dir.to_path_buf(),
            spec,
            input,
            expected,
        })
    }

    /// Create a case directory with an input and optional expected output
    pub fn create_case(
        &self,
        id: &str,
        spec: &CaseSpec,
        input: &Value,
        expected: Option<&Value>,
    ) -> Result<PathBuf> {
        let dir = self.corpus_dir.join(id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(CASE_FILE), serde_yaml::to_string(spec)?)?;
        fs::write(dir.join(INPUT_FILE), serde_yaml::to_string(input)?)?;
        if let Some(expected) = expected {
            fs::write(dir.join(EXPECTED_FILE), serde_yaml::to_string(expected)?)?;
        }
        Ok(dir)
    }

    /// Get statistics about the corpus
    pub fn get_statistics(&self) -> Result<CorpusStatistics> {
        let tests = self.discover_tests()?;

        let mut stats = CorpusStatistics {
            total_tests: tests.len(),
            ..Default::default()
        };

        for test in tests {
            if test.spec.metadata.enabled {
                stats.enabled_tests += 1;
            } else {
                stats.disabled_tests += 1;
            }
            *stats.tests_by_category.entry(test.category).or_insert(0) += 1;
        }

        Ok(stats)
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Statistics about the test corpus
#[derive(Debug, Default)]
pub struct CorpusStatistics {
    pub total_tests: usize,
    pub enabled_tests: usize,
    pub disabled_tests: usize,
    pub tests_by_category: BTreeMap<String, usize>,
}
