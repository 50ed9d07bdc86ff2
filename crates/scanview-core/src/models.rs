//! Normalized data model shared by the ingestion pipeline and the view engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// =============================================================================
// RESOURCE TYPES
// =============================================================================

/// Supported resource kinds.
///
/// The display labels are the allow-list the normalizer checks derived
/// category labels against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    ComputeInstance,
    ComputeDisk,
    ComputeImage,
    MachineImage,
    ComputeSnapshot,
    ManagedZone,
    SqlInstance,
    CloudFunction,
    DnsPolicy,
    PubsubSub,
}

impl ResourceType {
    /// Every supported type, in filter-menu order.
    pub const ALL: [ResourceType; 10] = [
        ResourceType::ComputeInstance,
        ResourceType::ComputeDisk,
        ResourceType::ComputeImage,
        ResourceType::MachineImage,
        ResourceType::ComputeSnapshot,
        ResourceType::ManagedZone,
        ResourceType::SqlInstance,
        ResourceType::CloudFunction,
        ResourceType::DnsPolicy,
        ResourceType::PubsubSub,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::ComputeInstance => "Compute Instance",
            ResourceType::ComputeDisk => "Compute Disk",
            ResourceType::ComputeImage => "Compute Image",
            ResourceType::MachineImage => "Machine Image",
            ResourceType::ComputeSnapshot => "Compute Snapshot",
            ResourceType::ManagedZone => "Managed Zone",
            ResourceType::SqlInstance => "Sql Instance",
            ResourceType::CloudFunction => "Cloud Function",
            ResourceType::DnsPolicy => "Dns Policy",
            ResourceType::PubsubSub => "Pubsub Sub",
        }
    }

    /// Look up a type by its exact display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// The full set of types, used as the default type filter.
    pub fn all_set() -> BTreeSet<ResourceType> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::Parse(format!("unknown resource type: {s}")))
    }
}

impl Serialize for ResourceType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown resource type: {label}")))
    }
}

// =============================================================================
// RESOURCE RECORDS
// =============================================================================

/// A normalized raw attribute value. Only numbers and text survive
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(serde_json::Number),
    Text(String),
}

impl AttributeValue {
    /// Textual form used wherever a string is required (names, statuses,
    /// detail panel values).
    pub fn to_text(&self) -> String {
        match self {
            AttributeValue::Number(n) => n.to_string(),
            AttributeValue::Text(s) => s.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

/// One cloud resource after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Project the resource belongs to (from the document's project info).
    pub project_id: String,
    /// Name of the uploaded file that contributed this record.
    pub source_file: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// Category-specific attributes, carried through verbatim.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ResourceRecord {
    /// Parsed creation timestamp, if present and RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.creation_timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    }

    /// Look up a category-specific attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn status_color(&self) -> StatusColor {
        StatusColor::for_status(&self.status)
    }

    /// Key/value pairs for the detail panel: fixed fields first, then the
    /// remaining attributes in key order.
    pub fn detail_fields(&self) -> Vec<DetailField> {
        let mut fields = vec![
            DetailField::new("type", self.resource_type.label()),
            DetailField::new("name", &self.name),
            DetailField::new("status", &self.status),
        ];
        if let Some(id) = &self.id {
            fields.push(DetailField::new("id", id));
        }
        if let Some(ts) = &self.creation_timestamp {
            fields.push(DetailField::new("creationTimestamp", ts));
        }
        fields.push(DetailField::new("projectId", &self.project_id));
        fields.push(DetailField::new("sourceFile", &self.source_file));
        fields.extend(
            self.attributes
                .iter()
                .map(|(key, value)| DetailField::new(key, value.to_text())),
        );
        fields
    }
}

/// One row of the resource detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub key: String,
    pub value: String,
}

impl DetailField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Badge colour for a resource status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Blue,
    Red,
    Grey,
}

impl StatusColor {
    pub fn for_status(status: &str) -> Self {
        match status {
            "RUNNING" => StatusColor::Green,
            "READY" => StatusColor::Blue,
            "TERMINATED" => StatusColor::Red,
            _ => StatusColor::Grey,
        }
    }
}

// =============================================================================
// IAM RECORDS
// =============================================================================

/// A decoded IAM binding member (`"<type>:<identifier>"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Principal kind, e.g. `user`, `serviceAccount`, `group`.
    pub member_type: String,
    /// Principal identifier, usually an email address.
    pub identifier: String,
}

impl Member {
    /// Decode a raw member string by splitting on its first `:`.
    ///
    /// Members without a `:` (such as `allUsers`) keep the whole string as
    /// the type and get an empty identifier.
    pub fn parse(raw: &str) -> Self {
        let (member_type, identifier) = raw.split_once(':').unwrap_or((raw, ""));
        Self {
            member_type: member_type.to_string(),
            identifier: identifier.to_string(),
        }
    }
}

/// One IAM role binding after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IamRoleRecord {
    pub project_id: String,
    pub source_file: String,
    /// Composite key `"<projectId>__<shortRoleName>"`.
    pub role: String,
    pub members: Vec<Member>,
}

// =============================================================================
// FILES
// =============================================================================

/// A loaded input file and the project ids it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub project_ids: Vec<String>,
}

// =============================================================================
// VIEW PARAMETERS
// =============================================================================

/// Resource ordering selected in the sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAttribute {
    Name,
    /// Ascending creation timestamp.
    #[default]
    Date,
}

impl FromStr for SortAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortAttribute::Name),
            "date" => Ok(SortAttribute::Date),
            _ => Err(Error::Parse(format!("unknown sort attribute: {s}"))),
        }
    }
}

/// View state owned by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParameters {
    /// Resource browser search box (matched against resource names).
    pub search_query: String,
    /// IAM browser search box (matched against member identifiers).
    pub member_query: String,
    pub sort_attribute: SortAttribute,
    pub allowed_types: BTreeSet<ResourceType>,
    pub allowed_projects: BTreeSet<String>,
}

impl Default for ViewParameters {
    /// All types allowed, no projects allowed yet, date ordering.
    fn default() -> Self {
        Self {
            search_query: String::new(),
            member_query: String::new(),
            sort_attribute: SortAttribute::default(),
            allowed_types: ResourceType::all_set(),
            allowed_projects: BTreeSet::new(),
        }
    }
}

impl ViewParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_member_query(mut self, query: impl Into<String>) -> Self {
        self.member_query = query.into();
        self
    }

    pub fn with_sort(mut self, sort: SortAttribute) -> Self {
        self.sort_attribute = sort;
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = ResourceType>) -> Self {
        self.allowed_types = types.into_iter().collect();
        self
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_projects = projects.into_iter().map(Into::into).collect();
        self
    }
}
