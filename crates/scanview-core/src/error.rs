//! Error types for scanview.

use thiserror::Error;

/// Result type alias using scanview's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scanview operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File content is not valid JSON or lacks the project identity field
    #[error("Parse error: {0}")]
    Parse(String),

    /// A file with the same name is already loaded
    #[error("Duplicate file: {0}")]
    DuplicateFile(String),

    /// Upload submitted without a file
    #[error("No file selected")]
    NoFileSelected,

    /// File content could not be read
    #[error("Read error: {0}")]
    Read(String),

    /// Search pattern failed to compile (recovered by the matcher)
    #[error("Regex compile error: {0}")]
    RegexCompile(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Message shown in the upload panel's error slot.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Parse(_) => "Invalid file",
            Error::DuplicateFile(_) => "File already uploaded",
            Error::NoFileSelected => "No file selected",
            Error::Read(_) => "Could not read file",
            // Never reaches the user; the matcher falls back to substring search.
            Error::RegexCompile(_) => "Invalid search pattern",
            Error::Config(_) => "Invalid configuration",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Read(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let err = Error::Parse("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "Parse error: expected value at line 1");
    }

    #[test]
    fn test_error_display_duplicate_file() {
        let err = Error::DuplicateFile("scan.json".to_string());
        assert_eq!(err.to_string(), "Duplicate file: scan.json");
    }

    #[test]
    fn test_error_display_no_file_selected() {
        assert_eq!(Error::NoFileSelected.to_string(), "No file selected");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(Error::Parse(String::new()).user_message(), "Invalid file");
        assert_eq!(
            Error::DuplicateFile("a.json".into()).user_message(),
            "File already uploaded"
        );
        assert_eq!(Error::NoFileSelected.user_message(), "No file selected");
        assert_eq!(Error::Read("eof".into()).user_message(), "Could not read file");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Parse(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Read(ref msg) if msg.contains("file not found")));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
