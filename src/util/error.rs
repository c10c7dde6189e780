// DaocLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Non-matching log lines are not errors and never appear here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all DaocLog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DaocLogError {
    /// Template loading or validation failed.
    Template(TemplateError),

    /// Reading the combat log failed.
    Parse(ParseError),

    /// Writing events to the output failed.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for DaocLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(e) => write!(f, "Template error: {e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Export(e) => write!(f, "Output error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for DaocLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Template errors
// ---------------------------------------------------------------------------

/// Errors related to line template loading and validation.
#[derive(Debug)]
pub enum TemplateError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Template file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A required field is missing or empty.
    MissingField {
        template_id: String,
        field: &'static str,
    },

    /// The grammar pattern is not a valid regex.
    InvalidPattern {
        template_id: String,
        pattern: String,
        source: regex::Error,
    },

    /// The grammar pattern exceeds the maximum allowed length.
    PatternTooLong {
        template_id: String,
        length: usize,
        max_length: usize,
    },

    /// The grammar pattern lacks a named group the template kind needs.
    MissingCaptureGroup {
        template_id: String,
        group: &'static str,
    },

    /// A user template reuses an id that is already loaded. Built-in
    /// grammars cannot be replaced; the later file is ignored.
    DuplicateId {
        id: String,
        path: PathBuf,
        existing_builtin: bool,
    },

    /// Maximum number of templates exceeded.
    TooManyTemplates { count: usize, max: usize },

    /// I/O error reading a template file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Template '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { template_id, field } => {
                write!(
                    f,
                    "Template '{template_id}': missing required field '{field}'"
                )
            }
            Self::InvalidPattern {
                template_id,
                pattern,
                source,
            } => write!(
                f,
                "Template '{template_id}': invalid pattern '{pattern}': {source}"
            ),
            Self::PatternTooLong {
                template_id,
                length,
                max_length,
            } => write!(
                f,
                "Template '{template_id}': pattern is {length} chars, \
                 exceeds maximum of {max_length}"
            ),
            Self::MissingCaptureGroup { template_id, group } => write!(
                f,
                "Template '{template_id}': pattern has no '(?P<{group}>...)' capture group"
            ),
            Self::DuplicateId {
                id,
                path,
                existing_builtin,
            } => write!(
                f,
                "Template '{}': id '{id}' is already used by {}; file ignored",
                path.display(),
                if *existing_builtin {
                    "a built-in template"
                } else {
                    "another user template"
                }
            ),
            Self::TooManyTemplates { count, max } => {
                write!(f, "Too many templates loaded ({count}), maximum is {max}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading template '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TemplateError> for DaocLogError {
    fn from(e: TemplateError) -> Self {
        Self::Template(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors that end a parse run. Both variants are terminal: the event
/// sequence stops and events already produced stay produced.
#[derive(Debug)]
pub enum ParseError {
    /// The log file does not exist.
    FileNotFound { path: PathBuf },

    /// Any other I/O failure while opening or reading the log.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "log file not found at '{}'", path.display())
            }
            Self::Io { file, source } => {
                write!(f, "error reading '{}': {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::FileNotFound { .. } => None,
        }
    }
}

impl From<ParseError> for DaocLogError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing rendered events.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing to the output.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "write failed: {source}"),
            Self::Csv { source } => write!(f, "CSV output failed: {source}"),
            Self::Json { source } => write!(f, "JSON output failed: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for DaocLogError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading. Out-of-range values are
/// reported as warnings instead, see `platform::config`.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for DaocLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for DaocLog results.
pub type Result<T> = std::result::Result<T, DaocLogError>;
