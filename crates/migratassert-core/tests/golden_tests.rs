//! Golden tests for the migration engine
//!
//! Each case under `golden-corpus/` pairs a v4.4.0 input with the TC3
//! document it must migrate to. Set `UPDATE_GOLDEN=1` to regenerate.

use migratassert_golden::{golden_test, golden_test_batch};

golden_test_batch!("*");

golden_test!(golden_basic_minimal, "basic/minimal");
golden_test!(golden_basic_full_template, "basic/full-template");
golden_test!(golden_sections_passthrough, "sections/passthrough");
golden_test!(golden_source_default_local, "source/default-local");
golden_test!(golden_annotations_keyed, "annotations/keyed");
golden_test!(golden_provenance_synthesized_date, "provenance/synthesized-date");
golden_test!(golden_errors_bad_taxon, "errors/bad-taxon");
golden_test!(golden_encoding_keep_class_prefixes, "encoding/keep-class-prefixes");
