//! Resource normalizer: raw category entries to [`ResourceRecord`]s.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use scanview_core::defaults::{RESOURCE_NAME, RESOURCE_STATUS};
use scanview_core::{AttributeValue, ResourceRecord, ResourceType};

use crate::category::{match_category, CategoryMatch};
use crate::document::RawProjectDocument;

/// Raw keys owned by the record context; raw values never override them.
const CONTEXT_KEYS: [&str; 4] = ["projectId", "sourceFile", "file", "type"];

/// Normalize every supported resource category of a document.
///
/// Records keep category order and per-category input order. Categories
/// whose label is not a supported type, or whose value is not an array, are
/// skipped entirely.
pub fn normalize_resources(
    document: &RawProjectDocument,
    source_file: &str,
) -> Vec<ResourceRecord> {
    let project_id = document.project_id();
    let mut records = Vec::new();

    for category in &document.categories {
        let Some(matched) = match_category(&category.name) else {
            debug!(
                subsystem = "ingest",
                component = "resources",
                category = %category.name,
                "Ignoring unsupported category"
            );
            continue;
        };

        let Value::Array(items) = &category.value else {
            warn!(
                subsystem = "ingest",
                component = "resources",
                category = %category.name,
                "Supported category is not an array, skipping it"
            );
            continue;
        };

        let resource_type = matched.resource_type();
        if let CategoryMatch::Label(_) = matched {
            debug!(
                subsystem = "ingest",
                component = "resources",
                category = %category.name,
                resource_type = %resource_type,
                "Non-canonical category name adopted by label"
            );
        }

        let before = records.len();
        for (index, item) in items.iter().enumerate() {
            let Value::Object(raw) = item else {
                warn!(
                    subsystem = "ingest",
                    component = "resources",
                    category = %category.name,
                    index,
                    "Resource entry is not an object, skipping it"
                );
                continue;
            };
            let record = normalize_record(raw, resource_type, project_id, source_file);
            trace!(
                subsystem = "ingest",
                component = "resources",
                category = %category.name,
                name = %record.name,
                "Normalized resource"
            );
            records.push(record);
        }

        debug!(
            subsystem = "ingest",
            component = "resources",
            category = %category.name,
            resource_count = records.len() - before,
            "Normalized category"
        );
    }

    records
}

/// Build one record from a raw attribute object.
pub fn normalize_record(
    raw: &Map<String, Value>,
    resource_type: ResourceType,
    project_id: &str,
    source_file: &str,
) -> ResourceRecord {
    let mut attributes: BTreeMap<String, AttributeValue> = raw
        .iter()
        .filter(|(key, _)| !CONTEXT_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| normalize_value(value).map(|v| (key.clone(), v)))
        .collect();

    let name = take_text(&mut attributes, "name")
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| RESOURCE_NAME.to_string());
    let status = take_text(&mut attributes, "status")
        .filter(|status| !status.is_empty())
        .unwrap_or_else(|| RESOURCE_STATUS.to_string());
    let id = take_text(&mut attributes, "id");
    let creation_timestamp = take_text(&mut attributes, "creationTimestamp");

    ResourceRecord {
        project_id: project_id.to_string(),
        source_file: source_file.to_string(),
        resource_type,
        name,
        status,
        id,
        creation_timestamp,
        attributes,
    }
}

/// Normalize one raw attribute value.
///
/// Numbers are kept, text is reduced to its final path segment, and every
/// other JSON kind is dropped.
pub fn normalize_value(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Number(n) => Some(AttributeValue::Number(n.clone())),
        Value::String(s) => Some(AttributeValue::Text(terminal_segment(s).to_string())),
        _ => None,
    }
}

/// The substring after the last `/`, or the whole string when it has none.
///
/// ```
/// use scanview_ingest::resources::terminal_segment;
///
/// assert_eq!(terminal_segment("projects/p/zones/us-east1-b"), "us-east1-b");
/// assert_eq!(terminal_segment("vm-1"), "vm-1");
/// ```
pub fn terminal_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

fn take_text(attributes: &mut BTreeMap<String, AttributeValue>, key: &str) -> Option<String> {
    attributes.remove(key).map(|value| value.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Raw text keeps key order; a `json!` value would sort the keys.
    fn document(raw: &str) -> RawProjectDocument {
        RawProjectDocument::parse(raw).unwrap()
    }

    #[test]
    fn test_scenario_compute_instance() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "compute_instances": [{
                "name": "vm-1",
                "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/us-east1-b",
                "status": "RUNNING"
            }]
        }"#);

        let records = normalize_resources(&doc, "scan.json");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.resource_type, ResourceType::ComputeInstance);
        assert_eq!(r.name, "vm-1");
        assert_eq!(r.status, "RUNNING");
        assert_eq!(r.project_id, "p");
        assert_eq!(r.source_file, "scan.json");
        assert_eq!(
            r.attribute("zone"),
            Some(&AttributeValue::Text("us-east1-b".to_string()))
        );
    }

    #[test]
    fn test_defaults_for_missing_name_and_status() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "compute_disks": [{"sizeGb": "10"}, {"name": "", "status": ""}]
        }"#);
        let records = normalize_resources(&doc, "f.json");
        assert_eq!(records.len(), 2);
        for r in &records {
            assert_eq!(r.name, "unknown");
            assert_eq!(r.status, "READY");
        }
    }

    #[test]
    fn test_value_kinds() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "sql_instances": [{
                "name": "db",
                "id": 1234,
                "diskSize": 10.5,
                "settings": {"tier": "db-f1"},
                "ipAddresses": ["10.0.0.1"],
                "deletionProtection": true,
                "replica": null,
                "creationTimestamp": "2023-01-01T00:00:00Z"
            }]
        }"#);
        let r = &normalize_resources(&doc, "f.json")[0];
        assert_eq!(r.id.as_deref(), Some("1234"));
        assert_eq!(r.creation_timestamp.as_deref(), Some("2023-01-01T00:00:00Z"));
        assert_eq!(r.attributes.len(), 1);
        assert_eq!(r.attribute("diskSize").map(|v| v.to_text()), Some("10.5".to_string()));
    }

    #[test]
    fn test_context_fields_win_over_raw_keys() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "cloud_functions": [{
                "name": "fn",
                "projectId": "other",
                "file": "forged.json",
                "type": "Compute Disk"
            }]
        }"#);
        let r = &normalize_resources(&doc, "real.json")[0];
        assert_eq!(r.project_id, "p");
        assert_eq!(r.source_file, "real.json");
        assert_eq!(r.resource_type, ResourceType::CloudFunction);
        assert!(r.attributes.is_empty());
    }

    #[test]
    fn test_unsupported_and_non_array_categories_skipped() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "storage_buckets": [{"name": "bucket"}],
            "compute_images": {"name": "not-a-list"},
            "managed_zones": [{"name": "zone-a"}, "stray", 7]
        }"#);
        let records = normalize_resources(&doc, "f.json");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resource_type, ResourceType::ManagedZone);
    }

    #[test]
    fn test_category_and_item_order_preserved() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "pubsub_subs": [{"name": "s2"}, {"name": "s1"}],
            "compute_instances": [{"name": "vm-b"}, {"name": "vm-a"}]
        }"#);
        let names: Vec<String> = normalize_resources(&doc, "f.json")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["s2", "s1", "vm-b", "vm-a"]);
    }

    #[test]
    fn test_no_matching_categories_yields_empty() {
        let doc = document(r#"{"project_info": {"projectId": "p"}, "bq": []}"#);
        assert!(normalize_resources(&doc, "f.json").is_empty());
    }

    #[test]
    fn test_terminal_segment() {
        assert_eq!(terminal_segment("a/b/c"), "c");
        assert_eq!(terminal_segment("/leading"), "leading");
        assert_eq!(terminal_segment("trailing/"), "");
        assert_eq!(terminal_segment("plain"), "plain");
        assert_eq!(terminal_segment(""), "");
    }

    #[test]
    fn test_normalize_value_text_keeps_suffix_after_last_slash() {
        assert_eq!(
            normalize_value(&json!("zones/us-central1-a")),
            Some(AttributeValue::Text("us-central1-a".to_string()))
        );
        assert_eq!(normalize_value(&json!(false)), None);
    }
}
