//! IAM normalizer: policy bindings to [`IamRoleRecord`]s.

use tracing::debug;

use scanview_core::defaults::ROLE_KEY_SEPARATOR;
use scanview_core::{IamRoleRecord, Member};

use crate::document::RawProjectDocument;

/// Normalize the document's IAM policy. A document without one yields no
/// records.
pub fn normalize_roles(document: &RawProjectDocument, source_file: &str) -> Vec<IamRoleRecord> {
    let Some(bindings) = &document.iam_policy else {
        debug!(
            subsystem = "ingest",
            component = "iam",
            project_id = %document.project_id(),
            "Document has no IAM policy"
        );
        return Vec::new();
    };

    let project_id = document.project_id();
    bindings
        .iter()
        .map(|binding| IamRoleRecord {
            project_id: project_id.to_string(),
            source_file: source_file.to_string(),
            role: role_key(project_id, &binding.role),
            members: binding.members.iter().map(|m| Member::parse(m)).collect(),
        })
        .collect()
}

/// The short role name: the final path segment of a qualified role.
///
/// ```
/// use scanview_ingest::iam::short_role_name;
///
/// assert_eq!(short_role_name("roles/viewer"), "viewer");
/// assert_eq!(short_role_name("projects/p/roles/deployer"), "deployer");
/// ```
pub fn short_role_name(role: &str) -> &str {
    role.rsplit('/').next().unwrap_or(role)
}

/// Composite role key `"<projectId>__<shortRoleName>"`.
pub fn role_key(project_id: &str, role: &str) -> String {
    format!("{project_id}{ROLE_KEY_SEPARATOR}{}", short_role_name(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raw text keeps key order; a `json!` value would sort the keys.
    fn document(raw: &str) -> RawProjectDocument {
        RawProjectDocument::parse(raw).unwrap()
    }

    #[test]
    fn test_scenario_viewer_binding() {
        let doc = document(r#"{
            "project_info": {"projectId": "p"},
            "iam_policy": [{"role": "projects/p/roles/viewer", "members": ["user:a@x.com"]}]
        }"#);
        let roles = normalize_roles(&doc, "scan.json");
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].role, "p__viewer");
        assert_eq!(roles[0].project_id, "p");
        assert_eq!(roles[0].source_file, "scan.json");
        assert_eq!(
            roles[0].members,
            vec![Member {
                member_type: "user".to_string(),
                identifier: "a@x.com".to_string()
            }]
        );
    }

    #[test]
    fn test_predefined_role_and_member_order() {
        let doc = document(r#"{
            "project_info": {"projectId": "prod"},
            "iam_policy": [{
                "role": "roles/owner",
                "members": [
                    "serviceAccount:sa@prod.iam.gserviceaccount.com",
                    "group:ops@x.com",
                    "allUsers"
                ]
            }]
        }"#);
        let roles = normalize_roles(&doc, "f.json");
        assert_eq!(roles[0].role, "prod__owner");
        let types: Vec<&str> = roles[0]
            .members
            .iter()
            .map(|m| m.member_type.as_str())
            .collect();
        assert_eq!(types, vec!["serviceAccount", "group", "allUsers"]);
    }

    #[test]
    fn test_missing_iam_policy_yields_empty() {
        let doc = document(r#"{"project_info": {"projectId": "p"}}"#);
        assert!(normalize_roles(&doc, "f.json").is_empty());
    }

    #[test]
    fn test_short_role_name_without_slash() {
        assert_eq!(short_role_name("owner"), "owner");
        assert_eq!(role_key("p", "owner"), "p__owner");
    }
}
