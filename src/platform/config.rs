// DaocLog - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::export::OutputFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DaocLog configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/daoclog/ or %APPDATA%\DaocLog\config\)
    pub config_dir: PathBuf,

    /// User template directory (e.g. ~/.config/daoclog/templates/ or %APPDATA%\DaocLog\templates\)
    pub user_templates_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let user_templates_dir = app_root(&config_dir).join(constants::TEMPLATES_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                templates = %user_templates_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                user_templates_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                user_templates_dir: fallback.join(constants::TEMPLATES_DIR_NAME),
                config_dir: fallback,
            }
        }
    }

    /// Location of config.toml for these paths.
    pub fn config_file(&self) -> PathBuf {
        app_root(&self.config_dir).join(constants::CONFIG_FILE_NAME)
    }
}

/// Directory holding config.toml and templates/.
///
/// On Windows `ProjectDirs` nests config one level deeper
/// (`%APPDATA%\DaocLog\config`); files live in the parent there so the
/// user-visible path stays short. Elsewhere the config dir is used as is.
fn app_root(config_dir: &Path) -> &Path {
    match (config_dir.file_name(), config_dir.parent()) {
        (Some(name), Some(parent)) if name == "config" => parent,
        _ => config_dir,
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still works
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[templates]` section.
    pub templates: TemplatesSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[templates]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TemplatesSection {
    /// Additional template directory.
    pub user_template_directory: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "text", "json" or "csv".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Template directory override; `None` means the platform default.
    pub user_template_dir: Option<PathBuf>,

    /// Output rendering when the CLI does not choose one.
    pub output_format: OutputFormat,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Load and validate config.toml from its default location.
///
/// Lenient: a missing file yields defaults with no warnings (first run),
/// and an unreadable or unparseable file yields defaults plus a warning.
pub fn load_config(paths: &PlatformPaths) -> (AppConfig, Vec<String>) {
    let config_path = paths.config_file();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load and validate a specific config file (the `--config` CLI option).
///
/// Strict: a file the user named explicitly must exist and parse.
pub fn load_config_file(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = parse_config(&content, path)?;
    tracing::info!(path = %path.display(), "Loaded config file");
    Ok(validate(raw))
}

/// Parse config.toml content. `path` is used for error messages only.
pub fn parse_config(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each raw field, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Templates: user_template_directory --
    if let Some(dir) = raw.templates.user_template_directory {
        if !dir.trim().is_empty() {
            config.user_template_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Output: format --
    if let Some(ref format) = raw.output.format {
        match format.to_lowercase().as_str() {
            "text" => config.output_format = OutputFormat::Text,
            "json" => config.output_format = OutputFormat::Json,
            "csv" => config.output_format = OutputFormat::Csv,
            other => warnings.push(format!(
                "[output] format = \"{other}\" is not recognised. \
                 Expected \"text\", \"json\" or \"csv\". Using default (text).",
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(content: &str) -> (AppConfig, Vec<String>) {
        validate(parse_config(content, Path::new("config.toml")).unwrap())
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        let (config, warnings) = from_str("");
        assert!(warnings.is_empty());
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.user_template_dir.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, warnings) = from_str(
            r#"
[templates]
user_template_directory = "/srv/daoc/templates"

[output]
format = "JSON"

[logging]
level = "Debug"
"#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            config.user_template_dir,
            Some(PathBuf::from("/srv/daoc/templates"))
        );
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let (config, warnings) = from_str(
            r#"
[output]
format = "xml"

[logging]
level = "loud"
"#,
        );
        assert_eq!(warnings.len(), 2);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = from_str("[future]\nshiny = true\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = parse_config("[output\nformat = ", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn test_explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_default_location_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PlatformPaths {
            config_dir: dir.path().join("config"),
            user_templates_dir: dir.path().join("templates"),
        };
        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty());
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_config_file_location() {
        let nested = PlatformPaths {
            config_dir: PathBuf::from("/appdata/DaocLog/config"),
            user_templates_dir: PathBuf::from("/appdata/DaocLog/templates"),
        };
        assert_eq!(nested.config_file(), PathBuf::from("/appdata/DaocLog/config.toml"));

        let flat = PlatformPaths {
            config_dir: PathBuf::from("/home/me/.config/daoclog"),
            user_templates_dir: PathBuf::from("/home/me/.config/daoclog/templates"),
        };
        assert_eq!(
            flat.config_file(),
            PathBuf::from("/home/me/.config/daoclog/config.toml")
        );
    }

    #[test]
    fn test_default_location_bad_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PlatformPaths {
            config_dir: dir.path().join("config"),
            user_templates_dir: dir.path().join("templates"),
        };
        std::fs::write(paths.config_file(), "not = [valid").unwrap();
        let (_, warnings) = load_config(&paths);
        assert_eq!(warnings.len(), 1);
    }
}
