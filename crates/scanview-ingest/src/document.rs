//! Validating deserialization of scanner output documents.
//!
//! A document is a JSON object describing one cloud project:
//!
//! ```json
//! {
//!   "project_info": { "projectId": "p", "projectNumber": "1234", "name": "Prod" },
//!   "iam_policy": [ { "role": "roles/viewer", "members": ["user:a@x.com"] } ],
//!   "compute_instances": [ { "name": "vm-1", "zone": ".../zones/us-east1-b" } ]
//! }
//! ```
//!
//! `project_info.projectId` is the only required field. Every key other than
//! `project_info` and `iam_policy` is kept as a resource category in document
//! order; interpreting categories is the normalizers' job.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use scanview_core::defaults::{IAM_POLICY_KEY, PROJECT_INFO_KEY};
use scanview_core::{Error, Result};

/// Project identity metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub project_number: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
}

/// `projectNumber` is a string in current scanner output and a number in
/// older output; accept both.
fn scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// One IAM policy binding as it appears in the raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBinding {
    pub role: String,
    pub members: Vec<String>,
}

impl RawBinding {
    /// Decode the `iam_policy` value, skipping malformed bindings.
    ///
    /// A non-array value yields no bindings. A binding without a textual
    /// `role` is dropped; non-text members are dropped.
    fn decode_all(value: Value) -> Vec<RawBinding> {
        let Value::Array(items) = value else {
            warn!(
                subsystem = "ingest",
                component = "document",
                "iam_policy is not an array, ignoring it"
            );
            return Vec::new();
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let Some(role) = item.get("role").and_then(Value::as_str) else {
                    warn!(
                        subsystem = "ingest",
                        component = "document",
                        index,
                        "IAM binding has no textual role, skipping it"
                    );
                    return None;
                };
                let members = match item.get("members") {
                    Some(Value::Array(members)) => members
                        .iter()
                        .filter_map(|m| {
                            let member = m.as_str();
                            if member.is_none() {
                                warn!(
                                    subsystem = "ingest",
                                    component = "document",
                                    index,
                                    role,
                                    "Non-text IAM member skipped"
                                );
                            }
                            member.map(str::to_string)
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                Some(RawBinding {
                    role: role.to_string(),
                    members,
                })
            })
            .collect()
    }
}

/// One resource category entry: a raw key and its untouched value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCategory {
    pub name: String,
    pub value: Value,
}

/// A validated scanner output document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProjectDocument {
    pub project: ProjectInfo,
    /// `None` when the document carries no `iam_policy` key.
    pub iam_policy: Option<Vec<RawBinding>>,
    /// Remaining top-level entries, in document order.
    pub categories: Vec<RawCategory>,
}

impl RawProjectDocument {
    /// Parse and validate raw file content.
    ///
    /// Fails with [`Error::Parse`] when the text is not JSON, is not an
    /// object, or lacks a textual `project_info.projectId`.
    pub fn parse(raw: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(raw)?;
        if document.project.project_id.is_empty() {
            return Err(Error::Parse("project_info.projectId is empty".to_string()));
        }
        Ok(document)
    }

    pub fn project_id(&self) -> &str {
        &self.project.project_id
    }
}

impl<'de> Deserialize<'de> for RawProjectDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = RawProjectDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scanner output object with project_info")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut map: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut project: Option<ProjectInfo> = None;
        let mut iam_policy: Option<Vec<RawBinding>> = None;
        let mut categories: Vec<RawCategory> = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                PROJECT_INFO_KEY => project = Some(map.next_value()?),
                IAM_POLICY_KEY => {
                    iam_policy = Some(RawBinding::decode_all(map.next_value()?));
                }
                _ => {
                    let value: Value = map.next_value()?;
                    // Repeated keys keep their first position and last value.
                    match categories.iter_mut().find(|c| c.name == key) {
                        Some(existing) => existing.value = value,
                        None => categories.push(RawCategory { name: key, value }),
                    }
                }
            }
        }

        let project = project.ok_or_else(|| de::Error::missing_field(PROJECT_INFO_KEY))?;

        Ok(RawProjectDocument {
            project,
            iam_policy,
            categories,
        })
    }
}
