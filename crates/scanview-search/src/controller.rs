//! View controller.
//!
//! Owns the dataset store, the upload panel and the current
//! [`ViewParameters`]. Every input change schedules a debounced recompute of
//! the affected view; results are published on `watch` channels that the
//! resource browser and the IAM browser subscribe to.
//!
//! | Input | Resource view | Role view |
//! |-------|:---:|:---:|
//! | file added / removed | x | x |
//! | `search_query` | x | |
//! | `sort_attribute` | x | |
//! | `allowed_types` | x | |
//! | `allowed_projects` | x | x |
//! | `member_query` | | x |
//!
//! Setters only schedule when the value actually changes.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use scanview_core::{
    IamRoleRecord, ResourceRecord, ResourceType, Result, SortAttribute, UploadedFile,
    ViewParameters, ViewerConfig,
};
use scanview_ingest::{DatasetStore, FileSource, FileSummary, RemovedFile, UploadPanel};

use crate::debounce::{Debouncer, SupersedeToken};
use crate::filter::{
    filter_resources_with, filter_roles_with, group_roles_by_project, ProjectRoles,
};
use crate::matcher::TextMatcher;

/// Published state of the resource browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    /// Generation of the recompute that produced this view (0 = initial).
    pub generation: u64,
    pub resources: Vec<ResourceRecord>,
    /// The search query did not compile and was matched as plain text.
    pub query_fallback: bool,
}

/// Published state of the IAM browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub generation: u64,
    pub groups: Vec<ProjectRoles>,
    pub role_count: usize,
}

/// Owner of the loaded dataset and the parameters of both browsers.
///
/// # Panics
///
/// Recomputes run on spawned tokio tasks. The setters, [`Self::set_params`],
/// [`Self::remove_file`] and the upload methods schedule one, so they panic
/// when called outside a tokio runtime. Construction and the read accessors
/// do not need a runtime.
pub struct ViewController {
    config: ViewerConfig,
    store: DatasetStore,
    panel: UploadPanel,
    params: ViewParameters,
    resource_debouncer: Debouncer,
    role_debouncer: Debouncer,
    resource_tx: Arc<watch::Sender<Arc<ResourceView>>>,
    role_tx: Arc<watch::Sender<Arc<RoleView>>>,
}

impl ViewController {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let (resource_tx, _) = watch::channel(Arc::new(ResourceView::default()));
        let (role_tx, _) = watch::channel(Arc::new(RoleView::default()));
        Ok(Self {
            store: DatasetStore::new().with_max_file_bytes(config.max_file_bytes),
            panel: UploadPanel::new(),
            params: ViewParameters::default(),
            resource_debouncer: Debouncer::new("resources", config.resource_debounce()),
            role_debouncer: Debouncer::new("roles", config.role_debounce()),
            resource_tx: Arc::new(resource_tx),
            role_tx: Arc::new(role_tx),
            config,
        })
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    pub fn subscribe_resources(&self) -> watch::Receiver<Arc<ResourceView>> {
        self.resource_tx.subscribe()
    }

    pub fn subscribe_roles(&self) -> watch::Receiver<Arc<RoleView>> {
        self.role_tx.subscribe()
    }

    /// Last published resource view.
    pub fn resource_view(&self) -> Arc<ResourceView> {
        Arc::clone(&self.resource_tx.borrow())
    }

    /// Last published role view.
    pub fn role_view(&self) -> Arc<RoleView> {
        Arc::clone(&self.role_tx.borrow())
    }

    // =========================================================================
    // FILES
    // =========================================================================

    /// Upload the selected file. New projects start out allowed.
    ///
    /// On failure the error lands in the panel's slot and no recompute is
    /// scheduled.
    pub async fn upload<S>(&mut self, selection: Option<&S>) -> Result<FileSummary>
    where
        S: FileSource + ?Sized,
    {
        let summary = self.panel.submit(&mut self.store, selection).await?;
        self.params
            .allowed_projects
            .extend(summary.new_project_ids.iter().cloned());
        self.refresh_all();
        Ok(summary)
    }

    /// Upload several files sequentially, then recompute once.
    pub async fn upload_batch<S: FileSource>(
        &mut self,
        files: &[S],
    ) -> Vec<Result<FileSummary>> {
        let results = self.panel.submit_batch(&mut self.store, files).await;
        let mut any_added = false;
        for summary in results.iter().flatten() {
            any_added = true;
            self.params
                .allowed_projects
                .extend(summary.new_project_ids.iter().cloned());
        }
        if any_added {
            self.refresh_all();
        }
        results
    }

    /// Remove a loaded file. Projects that disappear with it leave the
    /// project filter.
    pub fn remove_file(&mut self, file_name: &str) -> Option<RemovedFile> {
        let removed = self.panel.remove(&mut self.store, file_name)?;
        for project_id in &removed.removed_project_ids {
            self.params.allowed_projects.remove(project_id);
        }
        self.refresh_all();
        Some(removed)
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.params.search_query != query {
            self.params.search_query = query;
            self.schedule_resources();
        }
    }

    pub fn set_member_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.params.member_query != query {
            self.params.member_query = query;
            self.schedule_roles();
        }
    }

    pub fn set_sort(&mut self, sort: SortAttribute) {
        if self.params.sort_attribute != sort {
            self.params.sort_attribute = sort;
            self.schedule_resources();
        }
    }

    /// Toggle one resource type in the type filter.
    pub fn set_type_allowed(&mut self, resource_type: ResourceType, allowed: bool) {
        let changed = if allowed {
            self.params.allowed_types.insert(resource_type)
        } else {
            self.params.allowed_types.remove(&resource_type)
        };
        if changed {
            self.schedule_resources();
        }
    }

    /// Toggle one project in the project filter.
    pub fn set_project_allowed(&mut self, project_id: &str, allowed: bool) {
        let changed = if allowed {
            self.params.allowed_projects.insert(project_id.to_string())
        } else {
            self.params.allowed_projects.remove(project_id)
        };
        if changed {
            self.refresh_all();
        }
    }

    /// Replace all parameters at once.
    pub fn set_params(&mut self, params: ViewParameters) {
        let old = std::mem::replace(&mut self.params, params);
        let projects_changed = old.allowed_projects != self.params.allowed_projects;
        let resources_changed = projects_changed
            || old.search_query != self.params.search_query
            || old.sort_attribute != self.params.sort_attribute
            || old.allowed_types != self.params.allowed_types;
        let roles_changed = projects_changed || old.member_query != self.params.member_query;
        if resources_changed {
            self.schedule_resources();
        }
        if roles_changed {
            self.schedule_roles();
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    /// Known project ids, for building the project filter.
    pub fn project_ids(&self) -> &[String] {
        self.store.project_ids()
    }

    pub fn files(&self) -> &[UploadedFile] {
        self.store.files()
    }

    /// Text of the upload panel's active error.
    pub fn error_message(&self) -> Option<&'static str> {
        self.panel.error_message()
    }

    /// Whether either view has a recompute waiting.
    pub fn is_recompute_pending(&self) -> bool {
        self.resource_debouncer.is_pending() || self.role_debouncer.is_pending()
    }

    /// Resource sequence for the current state, computed synchronously.
    pub fn derive_resources(&self) -> Vec<ResourceRecord> {
        let matcher =
            TextMatcher::with_size_limit(&self.params.search_query, self.config.regex_size_limit);
        filter_resources_with(self.store.resources(), &self.params, &matcher)
    }

    /// Role groups for the current state, computed synchronously.
    pub fn derive_roles(&self) -> Vec<ProjectRoles> {
        let matcher =
            TextMatcher::with_size_limit(&self.params.member_query, self.config.regex_size_limit);
        group_roles_by_project(filter_roles_with(self.store.roles(), &self.params, &matcher))
    }

    // =========================================================================
    // RECOMPUTE
    // =========================================================================

    fn refresh_all(&mut self) {
        self.schedule_resources();
        self.schedule_roles();
    }

    fn schedule_resources(&mut self) {
        let resources = self.store.snapshot().resources;
        let params = self.params.clone();
        let size_limit = self.config.regex_size_limit;
        let tx = Arc::clone(&self.resource_tx);

        self.resource_debouncer.schedule(move |token| {
            let started = Instant::now();
            let matcher = TextMatcher::with_size_limit(&params.search_query, size_limit);
            let view = ResourceView {
                generation: token.generation(),
                resources: filter_resources_with(&resources, &params, &matcher),
                query_fallback: matcher.is_fallback(),
            };
            let result_count = view.resources.len();
            publish(&tx, &token, view);
            debug!(
                subsystem = "search",
                component = "controller",
                op = "recompute_resources",
                generation = token.generation(),
                result_count,
                duration_ms = started.elapsed().as_millis() as u64,
                "Resource view recomputed"
            );
        });
    }

    fn schedule_roles(&mut self) {
        let roles: Arc<Vec<IamRoleRecord>> = self.store.snapshot().roles;
        let params = self.params.clone();
        let size_limit = self.config.regex_size_limit;
        let tx = Arc::clone(&self.role_tx);

        self.role_debouncer.schedule(move |token| {
            let started = Instant::now();
            let matcher = TextMatcher::with_size_limit(&params.member_query, size_limit);
            let filtered = filter_roles_with(&roles, &params, &matcher);
            let view = RoleView {
                generation: token.generation(),
                role_count: filtered.len(),
                groups: group_roles_by_project(filtered),
            };
            let result_count = view.role_count;
            publish(&tx, &token, view);
            debug!(
                subsystem = "search",
                component = "controller",
                op = "recompute_roles",
                generation = token.generation(),
                result_count,
                duration_ms = started.elapsed().as_millis() as u64,
                "Role view recomputed"
            );
        });
    }
}

/// Publish unless a newer schedule happened while computing.
fn publish<T>(tx: &watch::Sender<Arc<T>>, token: &SupersedeToken, value: T) {
    let published = tx.send_if_modified(|slot| {
        if token.is_current() {
            *slot = Arc::new(value);
            true
        } else {
            false
        }
    });
    if !published {
        debug!(
            subsystem = "search",
            component = "controller",
            generation = token.generation(),
            "Recompute superseded before publish"
        );
    }
}
