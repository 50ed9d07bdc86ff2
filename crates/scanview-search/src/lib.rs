//! # scanview-search
//!
//! Filter/sort engine and view controller for scanview.
//!
//! This crate provides:
//! - Query matching (case-insensitive regex with substring fallback)
//! - Pure filter/sort derivations for resources and IAM roles
//! - A debouncer with explicit superseding
//! - `ViewController`, which recomputes and publishes views on input change
//!
//! ## Example
//!
//! ```
//! use scanview_search::{filter_resources, SortAttribute, ViewParameters};
//! use scanview_ingest::DatasetStore;
//!
//! let mut store = DatasetStore::new();
//! let raw = r#"{
//!     "project_info": {"projectId": "p"},
//!     "compute_instances": [{"name": "web-2"}, {"name": "web-1"}, {"name": "db"}]
//! }"#;
//! store.add_file(raw, "scan.json").unwrap();
//!
//! let params = ViewParameters::default()
//!     .with_projects(["p"])
//!     .with_search_query("^WEB")
//!     .with_sort(SortAttribute::Name);
//! let names: Vec<_> = filter_resources(store.resources(), &params)
//!     .into_iter()
//!     .map(|r| r.name)
//!     .collect();
//! assert_eq!(names, ["web-1", "web-2"]);
//! ```

pub mod controller;
pub mod debounce;
pub mod filter;
pub mod matcher;

pub use scanview_core::{SortAttribute, ViewParameters};

pub use controller::{ResourceView, RoleView, ViewController};
pub use debounce::{Debouncer, SupersedeToken};
pub use filter::{
    filter_resources, filter_resources_with, filter_roles, filter_roles_with,
    group_roles_by_project, sort_resources, ProjectRoles,
};
pub use matcher::TextMatcher;
