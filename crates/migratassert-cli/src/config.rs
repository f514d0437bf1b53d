//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments, which override both
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::cli::MigrateArgs;
use crate::error::{Error, Result};
use migratassert_core::{AnnotationLayout, MigrationOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of project configuration files in the working directory
const PROJECT_CONFIG_STEM: &str = ".migratassert";

/// Supported configuration file extensions, in lookup order
const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Migration behavior
    pub migration: MigrationConfig,

    /// Batch settings
    pub batch: BatchConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Migration behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Shape of the annotations block (tagged or keyed)
    pub annotations: AnnotationLayout,

    /// Strip `biolink:` from prioritize/avoid class lists
    pub strip_class_prefixes: bool,

    /// Fill in ./DATALAKE paths for sources without posix_filepath
    pub default_local_paths: bool,
}

/// Batch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads; 0 uses one per CPU
    pub jobs: usize,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        let options = MigrationOptions::default();
        Self {
            annotations: options.annotations,
            strip_class_prefixes: options.strip_class_prefixes,
            default_local_paths: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

/// Effective settings for one `migrate` run
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationSettings {
    pub options: MigrationOptions,
    pub default_local_paths: bool,
    pub jobs: usize,
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from a file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported config file extension: {}",
                    path.display()
                )))
            }
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{PROJECT_CONFIG_STEM}.{ext}")))
            .collect();

        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("migratassert");
            paths.extend(CONFIG_EXTENSIONS.iter().map(|ext| app_dir.join(format!("config.{ext}"))));
        }

        paths
    }

    /// Render the configuration in the given format
    pub fn render(&self, format: crate::cli::ConfigFormat) -> Result<String> {
        use crate::cli::ConfigFormat;
        Ok(match format {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Save configuration to a file, choosing the format by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        use crate::cli::ConfigFormat;
        let format = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        };
        let content = self.render(format)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Combine this configuration with `migrate` flags, flags taking precedence
    pub fn migration_settings(&self, args: &MigrateArgs) -> MigrationSettings {
        let annotations = args
            .annotations
            .map(AnnotationLayout::from)
            .unwrap_or(self.migration.annotations);

        MigrationSettings {
            options: MigrationOptions {
                annotations,
                strip_class_prefixes: self.migration.strip_class_prefixes && !args.keep_class_prefixes,
            },
            default_local_paths: self.migration.default_local_paths && !args.no_default_local,
            jobs: args.jobs.unwrap_or(self.batch.jobs),
            dry_run: args.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AnnotationsArg, ConfigFormat};
    use tempfile::TempDir;

    fn migrate_args() -> MigrateArgs {
        MigrateArgs {
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            dry_run: false,
            annotations: None,
            keep_class_prefixes: false,
            no_default_local: false,
            jobs: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.migration.annotations, AnnotationLayout::Tagged);
        assert!(config.migration.strip_class_prefixes);
        assert!(config.migration.default_local_paths);
        assert_eq!(config.batch.jobs, 0);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_partial_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "migration:\n  annotations: keyed\nbatch:\n  jobs: 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.migration.annotations, AnnotationLayout::Keyed);
        assert!(config.migration.strip_class_prefixes);
        assert_eq!(config.batch.jobs, 3);
    }

    #[test]
    fn test_toml_and_json_files() {
        let dir = TempDir::new().unwrap();

        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "[migration]\nstrip_class_prefixes = false\n").unwrap();
        assert!(!Config::from_file(&toml_path).unwrap().migration.strip_class_prefixes);

        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"output": {"color": false}}"#).unwrap();
        assert!(!Config::from_file(&json_path).unwrap().output.color);
    }

    #[test]
    fn test_unknown_extension_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));

        let missing = dir.path().join("absent.yaml");
        assert!(matches!(Config::from_file(&missing), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_save_round_trips_each_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.migration.annotations = AnnotationLayout::Keyed;
        config.logging.level = Some("debug".to_string());

        for name in ["c.yaml", "c.json", "c.toml"] {
            let path = dir.path().join("nested").join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_render_toml() {
        let rendered = Config::default().render(ConfigFormat::Toml).unwrap();
        assert!(rendered.contains("[migration]"));
        assert!(rendered.contains("annotations = \"tagged\""));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.batch.jobs = 8;

        let settings = config.migration_settings(&migrate_args());
        assert_eq!(settings.options, MigrationOptions::default());
        assert!(settings.default_local_paths);
        assert_eq!(settings.jobs, 8);

        let args = MigrateArgs {
            dry_run: true,
            annotations: Some(AnnotationsArg::Keyed),
            keep_class_prefixes: true,
            no_default_local: true,
            jobs: Some(2),
            ..migrate_args()
        };
        let settings = config.migration_settings(&args);
        assert_eq!(settings.options.annotations, AnnotationLayout::Keyed);
        assert!(!settings.options.strip_class_prefixes);
        assert!(!settings.default_local_paths);
        assert_eq!(settings.jobs, 2);
        assert!(settings.dry_run);
    }
}
