//! Golden test infrastructure for the Migratassert migration engine
//!
//! A golden case is a directory holding a v4.4.0 `input.yaml`, the TC3
//! document it must migrate to in `expected.yaml`, and a `case.yaml`
//! describing options and expectations. Run with `UPDATE_GOLDEN=1` to
//! rewrite `expected.yaml` from the current output.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

pub mod corpus;
pub mod diff;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

pub use corpus::{CorpusManager, TestCase};
pub use diff::{DiffEngine, DiffOptions};
pub use runner::{GoldenTestRunner, TestResult};

/// Golden test error types
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Expected output mismatch: {0}")]
    Mismatch(String),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Test failed: {0}")]
    TestFailed(String),
}

pub type Result<T> = std::result::Result<T, GoldenError>;

/// Configuration for golden tests
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Root directory for test corpus
    pub corpus_dir: PathBuf,

    /// Whether to rewrite expected outputs
    pub update_expected: bool,

    /// Diff options
    pub diff_options: DiffOptions,

    /// Verbose output
    pub verbose: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        let update_expected = std::env::var("UPDATE_GOLDEN")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            corpus_dir: PathBuf::from("../../golden-corpus"),
            update_expected,
            diff_options: DiffOptions::default(),
            verbose: false,
        }
    }
}

impl GoldenConfig {
    /// Create config from environment and defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(corpus_dir) = std::env::var("GOLDEN_CORPUS_DIR") {
            config.corpus_dir = PathBuf::from(corpus_dir);
        }

        if let Ok(verbose) = std::env::var("GOLDEN_VERBOSE") {
            config.verbose = verbose == "1" || verbose.to_lowercase() == "true";
        }

        config
    }
}

/// Macro for defining golden tests
#[macro_export]
macro_rules! golden_test {
    ($name:ident, $test_path:expr) => {
        #[test]
        fn $name() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let config = GoldenConfig::from_env();
            let runner = GoldenTestRunner::new(config);

            if let Err(e) = runner.run_test($test_path) {
                panic!("Golden test failed: {}: {}", $test_path, e);
            }
        }
    };
}

/// Macro for batch golden tests
#[macro_export]
macro_rules! golden_test_batch {
    ($pattern:expr) => {
        #[test]
        fn golden_tests() {
            use $crate::{GoldenConfig, GoldenTestRunner};

            let config = GoldenConfig::from_env();
            let runner = GoldenTestRunner::new(config);

            if let Err(e) = runner.run_batch($pattern) {
                panic!("Golden test batch failed: {}: {}", $pattern, e);
            }
        }
    };
}
