//! Filter/sort engine.
//!
//! Pure derivations from dataset records and [`ViewParameters`] to the
//! sequences the browsers display. Nothing here touches the store.
//!
//! Resource pipeline, in order:
//!
//! 1. type filter (`allowed_types`)
//! 2. project filter (`allowed_projects`)
//! 3. text filter on `name` (`search_query`)
//! 4. sort by `sort_attribute`
//!
//! Role pipeline: project filter, then text filter on member identifiers
//! (`member_query`). Roles keep input order.

use std::cmp::Ordering;

use serde::Serialize;

use scanview_core::{IamRoleRecord, ResourceRecord, SortAttribute, ViewParameters};

use crate::matcher::TextMatcher;

// =============================================================================
// RESOURCES
// =============================================================================

/// Derive the resource browser's sequence.
pub fn filter_resources(
    records: &[ResourceRecord],
    params: &ViewParameters,
) -> Vec<ResourceRecord> {
    let matcher = TextMatcher::new(&params.search_query);
    filter_resources_with(records, params, &matcher)
}

/// [`filter_resources`] with a prebuilt matcher for `params.search_query`.
pub fn filter_resources_with(
    records: &[ResourceRecord],
    params: &ViewParameters,
    matcher: &TextMatcher,
) -> Vec<ResourceRecord> {
    let mut filtered: Vec<ResourceRecord> = records
        .iter()
        .filter(|r| params.allowed_types.contains(&r.resource_type))
        .filter(|r| params.allowed_projects.contains(&r.project_id))
        .filter(|r| matcher.is_match(&r.name))
        .cloned()
        .collect();
    sort_resources(&mut filtered, params.sort_attribute);
    filtered
}

/// Stable sort in place.
///
/// `Name` orders lexicographically. `Date` orders by ascending parsed
/// creation timestamp; records without a parseable timestamp go last.
pub fn sort_resources(records: &mut Vec<ResourceRecord>, sort: SortAttribute) {
    match sort {
        SortAttribute::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
        SortAttribute::Date => {
            let mut keyed: Vec<_> = records.drain(..).map(|r| (r.created_at(), r)).collect();
            keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
            records.extend(keyed.into_iter().map(|(_, r)| r));
        }
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Derive the IAM browser's role sequence.
pub fn filter_roles(roles: &[IamRoleRecord], params: &ViewParameters) -> Vec<IamRoleRecord> {
    let matcher = TextMatcher::new(&params.member_query);
    filter_roles_with(roles, params, &matcher)
}

/// [`filter_roles`] with a prebuilt matcher for `params.member_query`.
pub fn filter_roles_with(
    roles: &[IamRoleRecord],
    params: &ViewParameters,
    matcher: &TextMatcher,
) -> Vec<IamRoleRecord> {
    roles
        .iter()
        .filter(|r| params.allowed_projects.contains(&r.project_id))
        .filter(|r| match matcher {
            TextMatcher::Any => true,
            _ => r.members.iter().any(|m| matcher.is_match(&m.identifier)),
        })
        .cloned()
        .collect()
}

/// Roles of one project, for the collapsible per-project table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoles {
    pub project_id: String,
    pub roles: Vec<IamRoleRecord>,
}

/// Group roles by project in order of each project's first appearance.
pub fn group_roles_by_project(roles: Vec<IamRoleRecord>) -> Vec<ProjectRoles> {
    let mut groups: Vec<ProjectRoles> = Vec::new();
    for role in roles {
        match groups.iter_mut().find(|g| g.project_id == role.project_id) {
            Some(group) => group.roles.push(role),
            None => groups.push(ProjectRoles {
                project_id: role.project_id.clone(),
                roles: vec![role],
            }),
        }
    }
    groups
}
