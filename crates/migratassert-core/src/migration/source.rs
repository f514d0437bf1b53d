//! Map the `location` block (plus `reindexing`) to the TC3 `source` block
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::document::{as_list, as_mapping, as_str, non_null};
use crate::types::{Document, MapResult};
use crate::Result;
use serde_json::Value;

/// Directory that default local paths are placed under
pub const DATALAKE_DIR: &str = "./DATALAKE";

/// Open-ended upper bound of a row slice
pub const AUTO_ROW_BOUND: &str = "auto";

/// Kind of tabular file a source points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Excel,
    Text,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Excel => "excel",
            FileKind::Text => "text",
        }
    }

    /// Extension of the default local file for this kind
    pub fn default_extension(self) -> &'static str {
        match self {
            FileKind::Excel => "xlsx",
            FileKind::Text => "csv",
        }
    }
}

/// Infer the file kind from an extension such as `xlsx` or `.TSV`
///
/// Unknown extensions are treated as text.
pub fn file_kind(extension: &str) -> FileKind {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "xlsx" | "xls" => FileKind::Excel,
        "csv" | "tsv" | "txt" => FileKind::Text,
        _ => FileKind::Text,
    }
}

/// Map v4.4.0 reindexing filters to TC3 `reindex` entries
///
/// `when` has no TC3 counterpart and is discarded. Filters missing
/// `column`, `comparison` or `value_for_comparison` are left out.
pub fn map_reindexing(filters: &[Value]) -> Vec<Value> {
    filters
        .iter()
        .filter_map(|filter| {
            let filter = filter.as_object()?;
            let (Some(column), Some(comparison), Some(comparator)) = (
                filter.get("column"),
                filter.get("comparison"),
                filter.get("value_for_comparison"),
            ) else {
                log::debug!("Skipping incomplete reindexing filter: {filter:?}");
                return None;
            };

            let mut entry = Document::new();
            entry.insert("column".to_string(), column.clone());
            entry.insert("comparison".to_string(), comparison.clone());
            entry.insert("comparator".to_string(), comparator.clone());
            Some(Value::Object(entry))
        })
        .collect()
}

/// Map a v4.4.0 location to a TC3 source
///
/// `file_stem` names the migrated file; when given and the location has no
/// `posix_filepath`, a default path under [`DATALAKE_DIR`] is filled in.
pub fn map_source(
    location: &Value,
    reindexing: Option<&Value>,
    file_stem: Option<&str>,
) -> Result<MapResult> {
    let location = as_mapping(location, "location")?;
    let empty = Document::new();
    let hyper = match non_null(location, "download_hyperparameters") {
        Some(hyper) => as_mapping(hyper, "location.download_hyperparameters")?,
        None => &empty,
    };

    let extension = match hyper.get("file_extension") {
        Some(ext) => Some(as_str(ext, "location.download_hyperparameters.file_extension")?),
        None => None,
    };
    let kind = extension.map(file_kind).unwrap_or(FileKind::Text);

    let mut source = Document::new();

    if let Some(url) = location.get("where_to_download_data_from") {
        source.insert("url".to_string(), url.clone());
    }

    if let Some(path) = location.get("posix_filepath") {
        source.insert("local".to_string(), path.clone());
    } else if let Some(stem) = file_stem.filter(|s| !s.is_empty()) {
        let local = format!("{DATALAKE_DIR}/{stem}.{}", kind.default_extension());
        source.insert("local".to_string(), Value::String(local));
    }

    if extension.is_some() {
        source.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
    }

    if let Some(delimiter) = hyper.get("file_delimiter") {
        source.insert("delimiter".to_string(), delimiter.clone());
    }
    if let Some(sheet) = hyper.get("which_excel_sheet_to_use") {
        source.insert("sheet".to_string(), sheet.clone());
    }

    let start = non_null(hyper, "start_at_line_number");
    let end = non_null(hyper, "end_at_line_number");
    if start.is_some() || end.is_some() {
        let start = start.cloned().unwrap_or_else(|| Value::from(1));
        let end = end
            .cloned()
            .unwrap_or_else(|| Value::String(AUTO_ROW_BOUND.to_string()));
        source.insert("row_slice".to_string(), Value::Array(vec![start, end]));
    }

    if let Some(rows) = hyper.get("use_row_numbers") {
        source.insert("rows".to_string(), rows.clone());
    }

    if let Some(reindexing) = reindexing.filter(|r| !r.is_null()) {
        let filters = as_list(reindexing, "reindexing")?;
        if !filters.is_empty() {
            source.insert("reindex".to_string(), Value::Array(map_reindexing(filters)));
        }
    }

    Ok(MapResult::new(source))
}
