//! Engine defaults and well-known names.

// -----------------------------------------------------------------------------
// Backtrace Rendering
// -----------------------------------------------------------------------------

/// Maximum number of frames shown by the `branch` display mode.
pub const DEFAULT_BRANCH_FRAMES: usize = 10;

/// Minimum width of the frame index column in rendered trees.
pub const MIN_INDEX_WIDTH: usize = 2;

/// Whether rich (unicode) glyphs are used by default.
pub const DEFAULT_UNICODE: bool = true;

/// One-line hint appended to interactive error messages.
pub const TRACE_REMINDER: &str = "Run `last_trace()` to see where the error occurred.";

// -----------------------------------------------------------------------------
// Environment
// -----------------------------------------------------------------------------

/// Environment variable holding the initial backtrace display mode.
pub const ENV_BACKTRACE_ON_ERROR: &str = "KLAXON_BACKTRACE_ON_ERROR";

/// Environment variable that disables rich glyphs when set.
pub const ENV_ASCII: &str = "KLAXON_ASCII";

// -----------------------------------------------------------------------------
// Lifecycle Classes
// -----------------------------------------------------------------------------

/// Class of the condition signaled for soft-deprecated features.
pub const CLASS_SOFT_DEPRECATED: &str = "lifecycle_soft_deprecated";

/// Class of the warning raised for deprecated features.
pub const CLASS_WARNING_DEPRECATED: &str = "lifecycle_warning_deprecated";

/// Class of the error raised for defunct features.
pub const CLASS_ERROR_DEFUNCT: &str = "lifecycle_error_defunct";

/// Data field carrying the identifier of a lifecycle signal.
pub const LIFECYCLE_ID_FIELD: &str = "id";
