// DaocLog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DaocLog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DaocLog";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Event defaults
// =============================================================================

/// Actor recorded as the source of every line phrased in the second person
/// ("You hit ..."). This is the log owner.
pub const SELF_ACTOR: &str = "You";

/// Damage type stored when a matching line carries no damage-type word.
pub const UNKNOWN_DAMAGE_TYPE: &str = "Unknown";

/// Default chrono format for the bracketed time-of-day prefix.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Template limits
// =============================================================================

/// Maximum number of line templates that can be loaded (built-in + user).
pub const MAX_TEMPLATES: usize = 100;

/// Maximum size of a template TOML file in bytes.
pub const MAX_TEMPLATE_FILE_SIZE: u64 = 64 * 1024; // 64 KB

/// Maximum regex pattern length to prevent ReDoS.
pub const MAX_PATTERN_LENGTH: usize = 4_096;

/// Named capture groups every damage template must define.
pub const REQUIRED_DAMAGE_GROUPS: &[&str] = &["timestamp", "target", "amount"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Diagnostics go to stderr, so only problems are shown
/// unless the user asks for more.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

/// Accepted values for `[logging] level` in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User templates subdirectory name.
pub const TEMPLATES_DIR_NAME: &str = "templates";

/// Process exit status when the run ends on an error.
pub const EXIT_FAILURE: i32 = 1;
