//! Resource category rules.
//!
//! Scanner output names each resource group with a plural snake_case key
//! (`compute_instances`, `dns_policies`). Known names are looked up in
//! [`CATEGORY_RULES`]. Any other name is still adopted when its derived
//! display label is one of the supported [`ResourceType`] labels; everything
//! else is ignored.

use scanview_core::ResourceType;

/// A known scanner category and the resource type its records become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: &'static str,
    pub resource_type: ResourceType,
}

/// Scanner categories that normalize into resource records.
pub const CATEGORY_RULES: [CategoryRule; 10] = [
    CategoryRule {
        category: "compute_instances",
        resource_type: ResourceType::ComputeInstance,
    },
    CategoryRule {
        category: "compute_disks",
        resource_type: ResourceType::ComputeDisk,
    },
    CategoryRule {
        category: "compute_images",
        resource_type: ResourceType::ComputeImage,
    },
    CategoryRule {
        category: "machine_images",
        resource_type: ResourceType::MachineImage,
    },
    CategoryRule {
        category: "compute_snapshots",
        resource_type: ResourceType::ComputeSnapshot,
    },
    CategoryRule {
        category: "managed_zones",
        resource_type: ResourceType::ManagedZone,
    },
    CategoryRule {
        category: "sql_instances",
        resource_type: ResourceType::SqlInstance,
    },
    CategoryRule {
        category: "cloud_functions",
        resource_type: ResourceType::CloudFunction,
    },
    CategoryRule {
        category: "dns_policies",
        resource_type: ResourceType::DnsPolicy,
    },
    CategoryRule {
        category: "pubsub_subs",
        resource_type: ResourceType::PubsubSub,
    },
];

/// Derive a display label from a plural category name.
///
/// Underscores become spaces, each word's first character is upper-cased,
/// and the trailing plural character is stripped. `...Policie` is corrected
/// to `...Policy`.
///
/// ```
/// use scanview_ingest::category::derive_type_label;
///
/// assert_eq!(derive_type_label("compute_instances"), "Compute Instance");
/// assert_eq!(derive_type_label("dns_policies"), "Dns Policy");
/// ```
pub fn derive_type_label(category: &str) -> String {
    let spaced = category.replace('_', " ");
    let mut label = spaced
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    label.pop();

    if let Some(stem) = label.strip_suffix("Policie") {
        label = format!("{stem}Policy");
    }
    label
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// How a raw category name was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Listed in [`CATEGORY_RULES`].
    Rule(&'static CategoryRule),
    /// Not listed, but its derived label is a supported type.
    Label(ResourceType),
}

impl CategoryMatch {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            CategoryMatch::Rule(rule) => rule.resource_type,
            CategoryMatch::Label(resource_type) => *resource_type,
        }
    }
}

/// Recognize a raw category name: rule table first, derived label second.
pub fn match_category(category: &str) -> Option<CategoryMatch> {
    if let Some(rule) = rule_for(category) {
        return Some(CategoryMatch::Rule(rule));
    }
    ResourceType::from_label(&derive_type_label(category)).map(CategoryMatch::Label)
}

/// Resolve a raw category name to the resource type it normalizes into.
pub fn resolve_category(category: &str) -> Option<ResourceType> {
    match_category(category).map(|m| m.resource_type())
}

/// Look up the rule for a canonical scanner category name.
pub fn rule_for(category: &str) -> Option<&'static CategoryRule> {
    CATEGORY_RULES.iter().find(|rule| rule.category == category)
}
