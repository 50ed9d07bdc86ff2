//! # scanview-core
//!
//! Core types, errors, and defaults for scanview, the browser for cloud
//! scanner inventory and IAM policy output.
//!
//! This crate provides the normalized data model that the ingestion and
//! search crates share.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types at crate root
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use models::*;
