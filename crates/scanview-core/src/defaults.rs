//! Centralized default constants for scanview.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Name given to a resource whose raw data carries none.
pub const RESOURCE_NAME: &str = "unknown";

/// Status given to a resource whose raw data carries none.
pub const RESOURCE_STATUS: &str = "READY";

/// Document key holding the project identity.
pub const PROJECT_INFO_KEY: &str = "project_info";

/// Document key holding the IAM policy bindings.
pub const IAM_POLICY_KEY: &str = "iam_policy";

/// Separator between project id and short role name in a role key.
pub const ROLE_KEY_SEPARATOR: &str = "__";

// =============================================================================
// RECOMPUTE
// =============================================================================

/// Debounce delay for the resource browser recompute, in milliseconds.
pub const RESOURCE_DEBOUNCE_MS: u64 = 100;

/// Debounce delay for the IAM role browser recompute, in milliseconds.
pub const ROLE_DEBOUNCE_MS: u64 = 200;

// =============================================================================
// LIMITS
// =============================================================================

/// Compiled size limit for user-typed search patterns (1 MiB).
pub const REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Largest accepted input file (64 MiB).
pub const MAX_FILE_BYTES: usize = 64 * 1024 * 1024;

/// Expected input file extension.
pub const FILE_EXTENSION: &str = "json";
