//! Migratassert Core - Mapping engine for Tablassert configuration migration
//!
//! This crate converts Tablassert v4.4.0 YAML configurations (already parsed
//! into [`serde_json::Value`]) into the TC3 schema, and reports every source
//! field that had no TC3 destination.
//!
//! # Main Components
//!
//! - **Block mappers**: one per template block (`location`, `triple`,
//!   `provenance`, `attributes`), see [`migration`]
//! - **Lossiness tracking**: [`DroppedFields`] per file and
//!   [`DroppedFieldHistogram`] across a batch
//! - **Error Handling**: structural errors carry the document path, using `thiserror`
//!
//! # Example
//!
//! ```
//! use migratassert_core::{transform_config, MigrationOptions, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let v440 = json!({
//!         "template": {
//!             "triple": {
//!                 "triple_subject": {
//!                     "encoding_method": "column",
//!                     "value_for_encoding": "gene",
//!                     "mapping_hyperparameters": {"how_to_fill_column": "ffill"}
//!                 }
//!             }
//!         }
//!     });
//!     let result = transform_config(&v440, Some("study"), &MigrationOptions::default())?;
//!     assert_eq!(result.template()["statement"]["subject"]["method"], "column");
//!     assert!(result.dropped_fields.contains("triple.subject.how_to_fill_column"));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod error;
pub mod lossiness;
pub mod migration;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use lossiness::{DroppedFieldHistogram, DroppedFields};
pub use migration::{
    map_annotations, map_node_encoding, map_provenance, map_source, map_statement,
    transform_config, TARGET_SYNTAX,
};
pub use types::{AnnotationLayout, Document, MapResult, MigrationOptions, TransformResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version this crate migrates from
pub const SOURCE_SCHEMA_VERSION: &str = "4.4.0";
