//! Batch migration of a directory of configurations
//!
//! Files are transformed in parallel and folded, in file-name order, into a
//! single [`MigrationSummary`].
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::config::MigrationSettings;
use crate::error::{Error, Result};
use indicatif::ProgressBar;
use migratassert_core::{transform_config, DroppedFieldHistogram, DroppedFields};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extensions picked up by [`discover_yaml_files`]
const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Outcome of migrating one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub success: bool,
    pub dropped_fields: DroppedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    /// File name of the source, for reports
    pub fn name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationSummary {
    pub files_processed: usize,
    pub files_succeeded: usize,
    pub files_failed: usize,
    pub file_results: Vec<FileResult>,
    pub dropped_histogram: DroppedFieldHistogram,
}

impl MigrationSummary {
    /// Fold one file's outcome into the summary
    pub fn record(&mut self, result: FileResult) {
        self.files_processed += 1;
        if result.success {
            self.files_succeeded += 1;
            self.dropped_histogram.record_all(&result.dropped_fields);
        } else {
            self.files_failed += 1;
        }
        self.file_results.push(result);
    }

    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }

    /// Results of the files that failed
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.file_results.iter().filter(|r| !r.success)
    }
}

/// List the YAML files directly inside `dir`, sorted by file name
pub fn discover_yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext));
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Migrate one file, capturing any failure in the result
pub fn migrate_file(source: &Path, dest: &Path, settings: &MigrationSettings) -> FileResult {
    match try_migrate_file(source, dest, settings) {
        Ok(dropped_fields) => FileResult {
            source_path: source.to_path_buf(),
            dest_path: dest.to_path_buf(),
            success: true,
            dropped_fields,
            error: None,
        },
        Err(e) => {
            warn!(file = %source.display(), error = %e, "Migration failed");
            FileResult {
                source_path: source.to_path_buf(),
                dest_path: dest.to_path_buf(),
                success: false,
                dropped_fields: DroppedFields::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Render a migrated document as YAML
///
/// Block sequences are written flush with their parent key (`rows:\n- 1`).
pub fn render_document(document: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

fn try_migrate_file(source: &Path, dest: &Path, settings: &MigrationSettings) -> Result<DroppedFields> {
    let content = fs::read_to_string(source)?;
    let config: Value = serde_yaml::from_str(&content)?;

    let stem = source.file_stem().and_then(|s| s.to_str());
    let file_stem = if settings.default_local_paths { stem } else { None };
    let result = transform_config(&config, file_stem, &settings.options)?;

    let rendered = render_document(&result.config)?;
    if settings.dry_run {
        debug!(file = %source.display(), "Dry run, not writing {}", dest.display());
    } else {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, rendered)?;
    }

    Ok(result.dropped_fields)
}

/// Migrate every YAML file in `input_dir` into `output_dir`
///
/// Individual file failures are recorded in the summary; only problems
/// with the directories themselves are returned as errors.
pub fn run_migration(
    input_dir: &Path,
    output_dir: &Path,
    settings: &MigrationSettings,
    progress: Option<&ProgressBar>,
) -> Result<MigrationSummary> {
    if !input_dir.exists() {
        return Err(Error::FileNotFound {
            path: input_dir.to_path_buf(),
        });
    }
    if !input_dir.is_dir() {
        return Err(Error::NotADirectory {
            path: input_dir.to_path_buf(),
        });
    }
    if !settings.dry_run {
        fs::create_dir_all(output_dir)?;
    }

    let files = discover_yaml_files(input_dir)?;
    info!(count = files.len(), input = %input_dir.display(), "Discovered configurations");
    if let Some(pb) = progress {
        pb.set_length(files.len() as u64);
    }

    let migrate = || -> Vec<FileResult> {
        files
            .par_iter()
            .map(|source| {
                let dest = match source.file_name() {
                    Some(name) => output_dir.join(name),
                    None => output_dir.to_path_buf(),
                };
                let result = migrate_file(source, &dest, settings);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                result
            })
            .collect()
    };

    let results = if settings.jobs > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.jobs)
            .build()
            .map_err(|e| Error::other(format!("Failed to start worker pool: {}", e)))?;
        pool.install(migrate)
    } else {
        migrate()
    };

    let mut summary = MigrationSummary::default();
    for result in results {
        summary.record(result);
    }

    info!(
        processed = summary.files_processed,
        succeeded = summary.files_succeeded,
        failed = summary.files_failed,
        dropped = summary.dropped_histogram.total(),
        "Batch complete"
    );
    Ok(summary)
}
