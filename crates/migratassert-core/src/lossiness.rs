//! Dropped-field tracking for migrations
//!
//! Every mapper returns the source fields it could not carry into the TC3
//! document as dotted paths rooted at the block they came from, e.g.
//! `attributes.p_value.how_to_fill_column`. Callers append the lists of
//! their children in order, so the dropped list of a whole document is the
//! concatenation of its blocks' lists.
//!
//! # Examples
//!
//! ```
//! use migratassert_core::lossiness::{DroppedFieldHistogram, DroppedFields};
//!
//! let mut subject = DroppedFields::new();
//! subject.record("triple.subject.", "how_to_fill_column");
//!
//! let mut dropped = DroppedFields::new();
//! dropped.append(subject);
//! dropped.push("attributes.notes.unknown");
//! assert_eq!(dropped.len(), 2);
//!
//! let mut histogram = DroppedFieldHistogram::new();
//! histogram.record_all(&dropped);
//! histogram.record_all(&dropped);
//! assert_eq!(histogram.count("triple.subject.how_to_fill_column"), 2);
//! ```
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered list of dropped-field paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroppedFields(Vec<String>);

impl DroppedFields {
    /// Create an empty list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record `prefix + key` as dropped
    pub fn record(&mut self, prefix: &str, key: &str) {
        let path = format!("{prefix}{key}");
        log::debug!("Dropping field {path}");
        self.0.push(path);
    }

    /// Record a full path as dropped
    pub fn push(&mut self, path: impl Into<String>) {
        self.0.push(path.into());
    }

    /// Append another list, preserving order
    pub fn append(&mut self, other: DroppedFields) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for DroppedFields {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl FromIterator<String> for DroppedFields {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for DroppedFields {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for DroppedFields {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DroppedFields {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DroppedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Occurrence counts of dropped-field paths across many documents
///
/// Counts are accumulated in one place after documents are transformed,
/// so parallel batches fold their per-file lists into a single histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroppedFieldHistogram {
    counts: BTreeMap<String, usize>,
}

impl DroppedFieldHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every path of one document's dropped list
    pub fn record_all(&mut self, dropped: &DroppedFields) {
        for path in dropped {
            *self.counts.entry(path.clone()).or_insert(0) += 1;
        }
    }

    /// Merge another histogram into this one
    pub fn merge(&mut self, other: DroppedFieldHistogram) {
        for (path, count) in other.counts {
            *self.counts.entry(path).or_insert(0) += count;
        }
    }

    /// Occurrences of a path (0 if never dropped)
    pub fn count(&self, path: &str) -> usize {
        self.counts.get(path).copied().unwrap_or(0)
    }

    /// Total number of dropped occurrences
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries ordered by descending count, then path
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(path, count)| (path.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}
