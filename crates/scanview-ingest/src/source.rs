//! File sources for the upload panel.
//!
//! Reading file content is the only suspending step of ingestion; everything
//! after it runs synchronously.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use scanview_core::{Error, Result};

/// A user-selected file whose content can be read asynchronously.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// File name as shown in the upload panel; used as the record source.
    fn name(&self) -> &str;

    /// Content size in bytes, when it can be known without reading.
    async fn byte_len(&self) -> Result<Option<u64>> {
        Ok(None)
    }

    /// Read the whole file as UTF-8 text.
    async fn read_to_string(&self) -> Result<String>;
}

#[async_trait]
impl<T: FileSource + ?Sized> FileSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn byte_len(&self) -> Result<Option<u64>> {
        (**self).byte_len().await
    }

    async fn read_to_string(&self) -> Result<String> {
        (**self).read_to_string().await
    }
}

/// File content already held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    contents: String,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

#[async_trait]
impl FileSource for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn byte_len(&self) -> Result<Option<u64>> {
        Ok(Some(self.contents.len() as u64))
    }

    async fn read_to_string(&self) -> Result<String> {
        Ok(self.contents.clone())
    }
}

/// A file on the local filesystem, named by its final path component.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn byte_len(&self) -> Result<Option<u64>> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        Ok(Some(metadata.len()))
    }

    async fn read_to_string(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        String::from_utf8(bytes)
            .map_err(|_| Error::Parse(format!("{} is not valid UTF-8", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_in_memory_file() {
        let file = InMemoryFile::new("scan.json", "{}");
        assert_eq!(file.name(), "scan.json");
        assert_eq!(file.read_to_string().await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_local_file_reads_content_and_name() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"project_info": {{"projectId": "p"}}}}"#).unwrap();

        let file = LocalFile::new(tmp.path());
        assert_eq!(
            file.name(),
            tmp.path().file_name().unwrap().to_string_lossy()
        );
        assert!(file.read_to_string().await.unwrap().contains("projectId"));
    }

    #[tokio::test]
    async fn test_byte_len_without_reading() {
        let file = InMemoryFile::new("scan.json", "{}");
        assert_eq!(file.byte_len().await.unwrap(), Some(2));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[b' '; 300]).unwrap();
        let local = LocalFile::new(tmp.path());
        assert_eq!(local.byte_len().await.unwrap(), Some(300));

        let boxed: Box<dyn FileSource> = Box::new(local);
        assert_eq!(boxed.byte_len().await.unwrap(), Some(300));
    }

    #[tokio::test]
    async fn test_local_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalFile::new(dir.path().join("absent.json"));
        assert_eq!(file.name(), "absent.json");
        assert!(matches!(file.read_to_string().await, Err(Error::Read(_))));
    }

    #[tokio::test]
    async fn test_local_file_non_utf8_is_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let file = LocalFile::new(tmp.path());
        assert!(matches!(file.read_to_string().await, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_boxed_source_delegates() {
        let boxed: Box<dyn FileSource> = Box::new(InMemoryFile::new("a.json", "x"));
        assert_eq!(boxed.name(), "a.json");
        assert_eq!(boxed.read_to_string().await.unwrap(), "x");
    }
}
