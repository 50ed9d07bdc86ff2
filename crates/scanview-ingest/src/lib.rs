//! # scanview-ingest
//!
//! Ingestion pipeline for cloud scanner output.
//!
//! This crate provides:
//! - Validating deserialization of raw project documents
//! - Resource normalization driven by the category rule table
//! - IAM binding normalization with decoded members
//! - A multi-file dataset store with exact add/remove
//! - File sources and the upload panel's single error slot
//!
//! ## Example
//!
//! ```
//! use scanview_ingest::DatasetStore;
//!
//! let mut store = DatasetStore::new();
//! let raw = r#"{
//!     "project_info": {"projectId": "p"},
//!     "compute_instances": [{"name": "vm-1", "zone": "zones/us-east1-b"}],
//!     "iam_policy": [{"role": "roles/viewer", "members": ["user:a@x.com"]}]
//! }"#;
//!
//! let summary = store.add_file(raw, "scan.json").unwrap();
//! assert_eq!(summary.resource_count, 1);
//! assert_eq!(store.roles()[0].role, "p__viewer");
//!
//! store.remove_file("scan.json");
//! assert!(store.is_empty());
//! ```

pub mod category;
pub mod document;
pub mod iam;
pub mod resources;
pub mod source;
pub mod store;
pub mod upload;

// Re-export core types
pub use scanview_core::*;

pub use category::{
    derive_type_label, match_category, resolve_category, CategoryMatch, CategoryRule,
    CATEGORY_RULES,
};
pub use document::{ProjectInfo, RawBinding, RawCategory, RawProjectDocument};
pub use iam::normalize_roles;
pub use resources::normalize_resources;
pub use source::{FileSource, InMemoryFile, LocalFile};
pub use store::{DatasetSnapshot, DatasetStore, FileSummary, RemovedFile};
pub use upload::UploadPanel;
