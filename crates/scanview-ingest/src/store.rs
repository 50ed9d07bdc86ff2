//! Multi-file dataset store.
//!
//! The store accumulates normalized records across uploaded files. Adding a
//! file is all-or-nothing: the duplicate check, size check, parse and both
//! normalizers run before the first mutation. Removing a file removes exactly
//! what it contributed.
//!
//! Record collections are `Arc`-backed so that [`DatasetStore::snapshot`] is
//! cheap; debounced recomputes work on snapshots while the store keeps
//! accepting mutations.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use scanview_core::defaults::MAX_FILE_BYTES;
use scanview_core::{Error, IamRoleRecord, ResourceRecord, Result, UploadedFile};

use crate::document::RawProjectDocument;
use crate::iam::normalize_roles;
use crate::resources::normalize_resources;

/// Outcome of a successful [`DatasetStore::add_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub file: String,
    pub resource_count: usize,
    pub role_count: usize,
    /// Project ids this file introduced to the store.
    pub new_project_ids: Vec<String>,
}

/// Outcome of a successful [`DatasetStore::remove_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedFile {
    pub file: UploadedFile,
    pub resource_count: usize,
    pub role_count: usize,
    /// Project ids no remaining file contributes.
    pub removed_project_ids: Vec<String>,
}

/// Immutable view of the store's records at one point in time.
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    pub resources: Arc<Vec<ResourceRecord>>,
    pub roles: Arc<Vec<IamRoleRecord>>,
}

/// Accumulated dataset of every loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStore {
    resources: Arc<Vec<ResourceRecord>>,
    roles: Arc<Vec<IamRoleRecord>>,
    files: Vec<UploadedFile>,
    project_ids: Vec<String>,
    max_file_bytes: usize,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self {
            resources: Arc::default(),
            roles: Arc::default(),
            files: Vec::new(),
            project_ids: Vec::new(),
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted file content, in bytes.
    pub fn with_max_file_bytes(mut self, bytes: usize) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Parse, normalize and merge one file.
    ///
    /// Fails with [`Error::DuplicateFile`] before any parsing when the name
    /// is already loaded, and with [`Error::Parse`] when the content is
    /// oversized or not a valid document. On failure the store is unchanged.
    pub fn add_file(&mut self, raw: &str, file_name: &str) -> Result<FileSummary> {
        if self.contains_file(file_name) {
            return Err(Error::DuplicateFile(file_name.to_string()));
        }
        self.check_size(raw.len() as u64)?;

        let document = RawProjectDocument::parse(raw)?;
        let resources = normalize_resources(&document, file_name);
        let roles = normalize_roles(&document, file_name);
        let project_id = document.project_id().to_string();

        // Nothing below can fail.
        let new_project_ids = if self.project_ids.contains(&project_id) {
            Vec::new()
        } else {
            self.project_ids.push(project_id.clone());
            vec![project_id.clone()]
        };
        let summary = FileSummary {
            file: file_name.to_string(),
            resource_count: resources.len(),
            role_count: roles.len(),
            new_project_ids,
        };
        Arc::make_mut(&mut self.resources).extend(resources);
        Arc::make_mut(&mut self.roles).extend(roles);
        self.files.push(UploadedFile {
            name: file_name.to_string(),
            project_ids: vec![project_id.clone()],
        });
        debug_assert!(self.references_only_loaded_files());

        info!(
            subsystem = "ingest",
            component = "store",
            op = "add_file",
            file = %file_name,
            project_id = %project_id,
            resource_count = summary.resource_count,
            role_count = summary.role_count,
            "File added to dataset"
        );
        Ok(summary)
    }

    /// Remove a file and everything it contributed.
    ///
    /// Project ids still contributed by another loaded file are kept.
    /// Returns `None` when no file of that name is loaded.
    pub fn remove_file(&mut self, file_name: &str) -> Option<RemovedFile> {
        let position = self.files.iter().position(|f| f.name == file_name)?;
        let file = self.files.remove(position);

        let resources_before = self.resources.len();
        Arc::make_mut(&mut self.resources).retain(|r| r.source_file != file_name);
        let roles_before = self.roles.len();
        Arc::make_mut(&mut self.roles).retain(|r| r.source_file != file_name);

        let still_contributed: BTreeSet<&str> = self
            .files
            .iter()
            .flat_map(|f| f.project_ids.iter().map(String::as_str))
            .collect();
        let removed_project_ids: Vec<String> = file
            .project_ids
            .iter()
            .filter(|p| !still_contributed.contains(p.as_str()))
            .cloned()
            .collect();
        self.project_ids.retain(|p| !removed_project_ids.contains(p));

        let removed = RemovedFile {
            resource_count: resources_before - self.resources.len(),
            role_count: roles_before - self.roles.len(),
            removed_project_ids,
            file,
        };

        info!(
            subsystem = "ingest",
            component = "store",
            op = "remove_file",
            file = %file_name,
            resource_count = removed.resource_count,
            role_count = removed.role_count,
            "File removed from dataset"
        );
        if !removed.removed_project_ids.is_empty() {
            debug!(
                subsystem = "ingest",
                component = "store",
                projects = ?removed.removed_project_ids,
                "Projects dropped with file"
            );
        }
        debug_assert!(self.references_only_loaded_files());
        Some(removed)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Largest accepted file content, in bytes.
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Fail with [`Error::Parse`] when `bytes` exceeds the size limit.
    pub fn check_size(&self, bytes: u64) -> Result<()> {
        if bytes > self.max_file_bytes as u64 {
            return Err(Error::Parse(format!(
                "file is {bytes} bytes, limit is {}",
                self.max_file_bytes
            )));
        }
        Ok(())
    }

    pub fn contains_file(&self, file_name: &str) -> bool {
        self.files.iter().any(|f| f.name == file_name)
    }

    /// Loaded files, in upload order.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn resources(&self) -> &[ResourceRecord] {
        &self.resources
    }

    pub fn roles(&self) -> &[IamRoleRecord] {
        &self.roles
    }

    /// Known project ids, in first-upload order.
    pub fn project_ids(&self) -> &[String] {
        &self.project_ids
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File names referenced by any stored record.
    pub fn referenced_files(&self) -> BTreeSet<&str> {
        self.resources
            .iter()
            .map(|r| r.source_file.as_str())
            .chain(self.roles.iter().map(|r| r.source_file.as_str()))
            .collect()
    }

    fn references_only_loaded_files(&self) -> bool {
        self.referenced_files()
            .into_iter()
            .all(|file| self.contains_file(file))
    }

    /// Cheap shared snapshot of the current records.
    pub fn snapshot(&self) -> DatasetSnapshot {
        DatasetSnapshot {
            resources: Arc::clone(&self.resources),
            roles: Arc::clone(&self.roles),
        }
    }
}
