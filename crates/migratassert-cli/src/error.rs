//! Error types and handling for the CLI
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from migratassert-core
    #[error("Migration error: {0}")]
    Core(#[from] migratassert_core::Error),

    /// File or directory not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a directory
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more files in a batch failed to migrate
    #[error("{failed} of {processed} file(s) failed to migrate")]
    MigrationFailed { failed: usize, processed: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MigrationFailed { .. } => 1,
            Self::Io(_) => 2,
            Self::Core(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::NotADirectory { .. } => 5,
            Self::Config(_) => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::TomlDe(_) | Self::TomlSer(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::NotADirectory { .. })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
