// DaocLog - core/template.rs
//
// Line template loading and validation.
// Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::template_mgr which feeds content here.

use crate::core::model::{LineTemplate, TemplateKind};
use crate::util::constants;
use crate::util::error::TemplateError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML template definition as deserialized from a .toml file.
/// This is validated and compiled into a `LineTemplate` for runtime use.
#[derive(Debug, Deserialize)]
pub struct TemplateDefinition {
    pub template: TemplateMeta,
    pub grammar: GrammarDef,
}

#[derive(Debug, Deserialize)]
pub struct TemplateMeta {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GrammarDef {
    #[serde(default)]
    pub kind: TemplateKind,
    pub pattern: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_timestamp_format() -> String {
    constants::DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_source() -> String {
    constants::SELF_ACTOR.to_string()
}

// =============================================================================
// Template validation and compilation
// =============================================================================

/// Parse a TOML string into a `TemplateDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_template_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<TemplateDefinition, TemplateError> {
    toml::from_str(toml_content).map_err(|e| TemplateError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Validate a `TemplateDefinition` and compile it into a runtime `LineTemplate`.
///
/// Validates:
/// - Required fields are present and non-empty
/// - The pattern is a valid regex within size limits
/// - The pattern exposes every named group its kind needs
///
/// The compiled pattern is anchored at the start of the line.
pub fn validate_and_compile(
    def: TemplateDefinition,
    source_path: &Path,
    is_builtin: bool,
) -> Result<LineTemplate, TemplateError> {
    let id = &def.template.id;

    if id.is_empty() {
        return Err(TemplateError::MissingField {
            template_id: "(empty)".to_string(),
            field: "template.id",
        });
    }
    if def.template.name.is_empty() {
        return Err(TemplateError::MissingField {
            template_id: id.clone(),
            field: "template.name",
        });
    }
    if def.grammar.pattern.is_empty() {
        return Err(TemplateError::MissingField {
            template_id: id.clone(),
            field: "grammar.pattern",
        });
    }
    if def.grammar.timestamp_format.is_empty() {
        return Err(TemplateError::MissingField {
            template_id: id.clone(),
            field: "grammar.timestamp_format",
        });
    }

    let pattern = compile_pattern(id, &def.grammar.pattern)?;

    let capture_names: Vec<&str> = pattern.capture_names().flatten().collect();
    for &group in def.grammar.kind.required_groups() {
        if !capture_names.contains(&group) {
            return Err(TemplateError::MissingCaptureGroup {
                template_id: id.clone(),
                group,
            });
        }
    }

    let has_source_group = capture_names.contains(&"source");
    if def.grammar.source.trim().is_empty() && !has_source_group {
        return Err(TemplateError::MissingField {
            template_id: id.clone(),
            field: "grammar.source",
        });
    }

    tracing::debug!(
        template_id = %id,
        source = %source_path.display(),
        kind = ?def.grammar.kind,
        source_group = has_source_group,
        "Template compiled"
    );

    Ok(LineTemplate {
        id: id.clone(),
        name: def.template.name,
        version: def.template.version,
        description: def.template.description,
        kind: def.grammar.kind,
        pattern,
        timestamp_format: def.grammar.timestamp_format,
        source: def.grammar.source,
        is_builtin,
    })
}

/// Compile a grammar pattern with length validation to prevent ReDoS.
///
/// The pattern is wrapped in `^(?:...)` so that a match can only begin at the
/// first character of the line, whatever the template author wrote.
fn compile_pattern(template_id: &str, pattern: &str) -> Result<Regex, TemplateError> {
    if pattern.len() > constants::MAX_PATTERN_LENGTH {
        return Err(TemplateError::PatternTooLong {
            template_id: template_id.to_string(),
            length: pattern.len(),
            max_length: constants::MAX_PATTERN_LENGTH,
        });
    }

    let anchored = format!("^(?:{pattern})");
    Regex::new(&anchored).map_err(|e| TemplateError::InvalidPattern {
        template_id: template_id.to_string(),
        pattern: pattern.to_string(),
        source: e,
    })
}

// =============================================================================
// Built-in templates (embedded at compile time)
// =============================================================================

/// Embedded TOML content for built-in templates.
/// Each tuple is (filename, TOML content).
pub fn builtin_template_sources() -> Vec<(&'static str, &'static str)> {
    vec![(
        "daoc_damage_dealt.toml",
        include_str!("../../templates/daoc_damage_dealt.toml"),
    )]
}

/// Load and validate all built-in templates.
///
/// Invalid templates are logged and skipped (non-fatal).
pub fn load_builtin_templates() -> Vec<LineTemplate> {
    let mut templates = Vec::new();

    for (filename, content) in builtin_template_sources() {
        let path = PathBuf::from(format!("<builtin>/{filename}"));
        match parse_template_toml(content, &path)
            .and_then(|def| validate_and_compile(def, &path, true))
        {
            Ok(template) => {
                tracing::debug!(
                    template_id = %template.id,
                    name = %template.name,
                    version = %template.version,
                    "Loaded built-in template"
                );
                templates.push(template);
            }
            Err(e) => {
                tracing::error!(file = filename, error = %e, "Failed to load built-in template");
            }
        }
    }

    templates
}

// =============================================================================
// Tests
// =============================================================================
