//! Map the `provenance` block to TC3 provenance
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::document::as_mapping;
use crate::types::{Document, MapResult};
use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use serde_json::Value;

/// Publication repositories TC3 records under `repo`
pub const PUBLICATION_REPOS: &[&str] = &["PMC", "PMID", "DOI"];

/// Split a publication CURIE into (upper-cased repo, id)
///
/// Without a `:` the repo is empty and the whole string is the id.
pub fn parse_publication_curie(curie: &str) -> (String, String) {
    match curie.split_once(':') {
        Some((repo, id)) => (repo.to_uppercase(), id.to_string()),
        None => (String::new(), curie.to_string()),
    }
}

/// Format a curation date the way TC3 expects, e.g. `09 JAN 2025`
pub fn format_curation_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string().to_uppercase()
}

/// Today's date in curation format
pub fn today_curation_date() -> String {
    format_curation_date(Local::now().date_naive())
}

/// Map v4.4.0 provenance to TC3 provenance
///
/// Nothing in this block is ever reported as dropped.
pub fn map_provenance(provenance: &Value) -> Result<MapResult> {
    let provenance = as_mapping(provenance, "provenance")?;
    let mut mapped = Document::new();

    if let Some(publication) = provenance.get("publication") {
        let curie = match publication {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(Error::invalid_structure("provenance.publication", "a string", other)),
        };
        let (repo, id) = parse_publication_curie(&curie);
        if PUBLICATION_REPOS.contains(&repo.as_str()) {
            mapped.insert("repo".to_string(), Value::String(repo));
        }
        mapped.insert("publication".to_string(), Value::String(id));
    }

    if let Some(name) = provenance.get("config_curator_name") {
        let mut contributor = Document::new();
        contributor.insert("kind".to_string(), Value::String("curation".to_string()));
        contributor.insert("name".to_string(), name.clone());

        let date = provenance
            .get("config_curator_date")
            .cloned()
            .unwrap_or_else(|| Value::String(today_curation_date()));
        contributor.insert("date".to_string(), date);

        if let Some(organization) = provenance.get("config_curator_organization") {
            contributor.insert(
                "organizations".to_string(),
                Value::Array(vec![organization.clone()]),
            );
        }
        if let Some(comment) = provenance.get("config_curator_comment") {
            contributor.insert("comment".to_string(), comment.clone());
        }

        mapped.insert(
            "contributors".to_string(),
            Value::Array(vec![Value::Object(contributor)]),
        );
    }

    Ok(MapResult::new(mapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_publication_curie() {
        assert_eq!(parse_publication_curie("PMC:11708054"), ("PMC".into(), "11708054".into()));
        assert_eq!(parse_publication_curie("pmid:12345678"), ("PMID".into(), "12345678".into()));
        assert_eq!(
            parse_publication_curie("DOI:10.1234/example:v2"),
            ("DOI".into(), "10.1234/example:v2".into())
        );
        assert_eq!(parse_publication_curie("11708054"), (String::new(), "11708054".into()));
    }

    #[test]
    fn test_maps_publication() {
        let result = map_provenance(&json!({"publication": "PMC:11708054"})).unwrap();
        assert_eq!(result.mapped, json!({"repo": "PMC", "publication": "11708054"}));
    }

    #[test]
    fn test_unrecognized_repo_keeps_id_only() {
        let result = map_provenance(&json!({"publication": "ARXIV:2401.00001"})).unwrap();
        assert_eq!(result.mapped, json!({"publication": "2401.00001"}));

        let result = map_provenance(&json!({"publication": "11708054"})).unwrap();
        assert_eq!(result.mapped, json!({"publication": "11708054"}));
    }

    #[test]
    fn test_curator_becomes_contributor() {
        let result = map_provenance(&json!({
            "publication": "PMID:12345",
            "config_curator_name": "Jane Doe",
            "config_curator_organization": "Example University",
            "config_curator_date": "09 JAN 2025",
            "config_curator_comment": "Manual migration test"
        }))
        .unwrap();
        assert_eq!(
            result.mapped["contributors"],
            json!([{
                "kind": "curation",
                "name": "Jane Doe",
                "date": "09 JAN 2025",
                "organizations": ["Example University"],
                "comment": "Manual migration test"
            }])
        );
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn test_curator_without_organization() {
        let result = map_provenance(&json!({"config_curator_name": "John Smith"})).unwrap();
        let contributor = &result.mapped["contributors"][0];
        assert_eq!(contributor["name"], "John Smith");
        assert!(contributor.get("organizations").is_none());
        assert!(contributor.get("comment").is_none());
    }

    #[test]
    fn test_synthesizes_date() {
        let result = map_provenance(&json!({"config_curator_name": "Jane Doe"})).unwrap();
        let date = result.mapped["contributors"][0]["date"].as_str().unwrap();
        assert!(!date.is_empty());
        assert_eq!(date, date.to_uppercase());
        assert_eq!(date.len(), 11);
    }

    #[test]
    fn test_format_curation_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(format_curation_date(date), "09 JAN 2025");
    }

    #[test]
    fn test_curator_fields_without_name_are_ignored() {
        let result = map_provenance(&json!({"config_curator_organization": "Lab"})).unwrap();
        assert_eq!(result.mapped, json!({}));
        assert!(result.dropped.is_empty());
    }
}
