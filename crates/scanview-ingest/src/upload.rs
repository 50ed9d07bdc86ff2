//! Upload panel: drives file sources into the dataset store.
//!
//! The panel holds a single error slot. Every submission clears it first, and
//! a failed submission fills it with the failure; the store is never left
//! partially updated.

use std::path::Path;

use tracing::{debug, warn};

use scanview_core::defaults::FILE_EXTENSION;
use scanview_core::{Error, Result};

use crate::source::FileSource;
use crate::store::{DatasetStore, FileSummary, RemovedFile};

/// Upload state owned by the UI: the active error, if any.
#[derive(Debug, Default)]
pub struct UploadPanel {
    error: Option<Error>,
}

impl UploadPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the selected file, or report that none was selected.
    ///
    /// The duplicate-name and size checks run before the file is read.
    pub async fn submit<S>(
        &mut self,
        store: &mut DatasetStore,
        selection: Option<&S>,
    ) -> Result<FileSummary>
    where
        S: FileSource + ?Sized,
    {
        self.error = None;
        let result = Self::ingest(store, selection).await;
        if let Err(err) = &result {
            warn!(
                subsystem = "ingest",
                component = "upload",
                error = %err,
                "Upload rejected"
            );
            self.error = Some(err.clone());
        }
        result
    }

    /// Submit several files one after another.
    ///
    /// Each file completes its whole pipeline before the next is read. The
    /// error slot ends up holding the last failure of the batch.
    pub async fn submit_batch<S: FileSource>(
        &mut self,
        store: &mut DatasetStore,
        files: &[S],
    ) -> Vec<Result<FileSummary>> {
        let mut results = Vec::with_capacity(files.len());
        let mut last_error = None;
        for file in files {
            let result = self.submit(store, Some(file)).await;
            if let Err(err) = &result {
                last_error = Some(err.clone());
            }
            results.push(result);
        }
        self.error = last_error;
        results
    }

    /// Remove a loaded file. Clears the error slot.
    pub fn remove(&mut self, store: &mut DatasetStore, file_name: &str) -> Option<RemovedFile> {
        self.error = None;
        store.remove_file(file_name)
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// User-facing text of the active error.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(Error::user_message)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    async fn ingest<S>(store: &mut DatasetStore, selection: Option<&S>) -> Result<FileSummary>
    where
        S: FileSource + ?Sized,
    {
        let file = selection.ok_or(Error::NoFileSelected)?;
        let name = file.name();

        if store.contains_file(name) {
            return Err(Error::DuplicateFile(name.to_string()));
        }
        let has_json_extension = Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION));
        if !has_json_extension {
            debug!(
                subsystem = "ingest",
                component = "upload",
                file = %name,
                "File has no .json extension, validating content anyway"
            );
        }

        if let Some(bytes) = file.byte_len().await? {
            store.check_size(bytes)?;
        }
        let content = file.read_to_string().await?;
        store.add_file(&content, name)
    }
}
