//! Error types for the migration core
//!
//! Fields that have no home in the TC3 schema are not errors: they are
//! collected as [`DroppedFields`](crate::lossiness::DroppedFields) and
//! reported by the caller. The variants here cover input that cannot be
//! translated at all, which fails the whole document.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::num::ParseIntError;
use thiserror::Error;

/// Main error type for migration operations
#[derive(Error, Debug)]
pub enum Error {
    /// Taxon CURIE whose local part is not an integer
    #[error("Invalid taxon identifier '{value}': {source}")]
    InvalidTaxon {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A block or field has the wrong shape (e.g. a list where a mapping is required)
    #[error("Invalid structure at '{path}': expected {expected}, found {found}")]
    InvalidStructure {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::InvalidStructure`] describing the offending value
    pub fn invalid_structure(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self::InvalidStructure {
            path: path.into(),
            expected,
            found: value_kind(found),
        }
    }

    /// Dotted path of the field that caused the failure, if known
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidTaxon { .. } => None,
            Self::InvalidStructure { path, .. } => Some(path),
        }
    }
}

/// Human name of a JSON value's kind, used in error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
