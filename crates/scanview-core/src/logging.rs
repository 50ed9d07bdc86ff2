//! Structured logging field name constants for scanview.
//!
//! All crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unexpected internal state |
//! | WARN  | Recoverable issue, malformed input skipped |
//! | INFO  | Dataset mutations (file added, file removed) |
//! | DEBUG | Decision points (category skipped, regex fallback, recompute superseded) |
//! | TRACE | Per-record iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "core", "ingest", "search"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "config", "document", "store", "resources", "upload", "controller"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "add_file", "remove_file", "recompute"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Uploaded file name.
pub const FILE: &str = "file";

/// Cloud project identifier.
pub const PROJECT_ID: &str = "project_id";

/// Raw resource category name.
pub const CATEGORY: &str = "category";

/// Search query text.
pub const QUERY: &str = "query";

/// Debounce generation number.
pub const GENERATION: &str = "generation";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of resource records produced or held.
pub const RESOURCE_COUNT: &str = "resource_count";

/// Number of IAM role records produced or held.
pub const ROLE_COUNT: &str = "role_count";

/// Number of records in a derived view.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
