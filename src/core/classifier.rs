// DaocLog - core/classifier.rs
//
// Line classification and field extraction using line templates.
// Core layer: a pure function of the input line, no I/O, no shared
// mutable state.

use crate::core::model::{CombatEvent, DamageEvent, LineTemplate, TemplateKind};
use crate::core::template;
use crate::util::constants;
use crate::util::logging::preview;
use chrono::{NaiveTime, Timelike};
use regex::Captures;
use std::sync::OnceLock;

/// Decides whether a raw log line is a recognised combat event and, if so,
/// extracts it.
///
/// Templates are tried in order; the first one that both matches the line
/// and yields valid field values wins. A line that no template accepts
/// produces nothing. That is the normal outcome for chat text, system
/// messages, incoming damage and misses, and is not an error.
#[derive(Debug, Clone)]
pub struct Classifier {
    templates: Vec<LineTemplate>,
}

impl Classifier {
    pub fn new(templates: Vec<LineTemplate>) -> Self {
        Self { templates }
    }

    /// Classifier over the templates embedded in the binary.
    pub fn builtin() -> Self {
        Self::new(template::load_builtin_templates())
    }

    pub fn templates(&self) -> &[LineTemplate] {
        &self.templates
    }

    /// Classify one line. Trailing line terminators are ignored.
    ///
    /// Returns at most one event per line: only the first match opportunity
    /// at the start of the line is considered.
    pub fn classify(&self, line: &str) -> Option<CombatEvent> {
        let line = line.trim_end_matches(['\r', '\n']);
        self.templates
            .iter()
            .find_map(|template| classify_with(template, line))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Classify a line against the built-in templates.
///
/// The built-in classifier is compiled once and shared for the life of the
/// process.
pub fn classify_line(line: &str) -> Option<CombatEvent> {
    static BUILTIN: OnceLock<Classifier> = OnceLock::new();
    BUILTIN.get_or_init(Classifier::builtin).classify(line)
}

fn classify_with(template: &LineTemplate, line: &str) -> Option<CombatEvent> {
    let caps = template.pattern.captures(line)?;
    match template.kind {
        TemplateKind::Damage => extract_damage(template, &caps, line).map(CombatEvent::Damage),
    }
}

/// Build a `DamageEvent` from a grammar match.
///
/// Fails closed: a timestamp that is not a real time of day, or an amount
/// outside the `u64` range, rejects the whole line instead of producing a
/// partially filled event.
fn extract_damage(template: &LineTemplate, caps: &Captures<'_>, line: &str) -> Option<DamageEvent> {
    let raw_ts = caps.name("timestamp")?.as_str();
    let timestamp = match parse_timestamp(raw_ts, &template.timestamp_format) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::debug!(
                template_id = %template.id,
                raw_timestamp = raw_ts,
                error = %e,
                line = preview(line),
                "Skipping line with invalid timestamp"
            );
            return None;
        }
    };

    let raw_amount = caps.name("amount")?.as_str().trim();
    let damage_amount = match raw_amount.parse::<u64>() {
        Ok(amount) => amount,
        Err(e) => {
            tracing::debug!(
                template_id = %template.id,
                raw_amount,
                error = %e,
                line = preview(line),
                "Skipping line with invalid damage amount"
            );
            return None;
        }
    };

    let target = caps.name("target")?.as_str().trim().to_string();

    let damage_type = non_blank(caps, "damage_type")
        .unwrap_or(constants::UNKNOWN_DAMAGE_TYPE)
        .to_string();

    let source = non_blank(caps, "source")
        .unwrap_or(template.source.as_str())
        .to_string();

    tracing::trace!(template_id = %template.id, line = preview(line), "Line classified");

    Some(DamageEvent {
        timestamp,
        source,
        target,
        damage_amount,
        damage_type,
    })
}

/// Trimmed text of an optional capture group, `None` when absent or blank.
fn non_blank<'t>(caps: &Captures<'t>, group: &str) -> Option<&'t str> {
    caps.name(group)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Parse a time-of-day string using a chrono format string.
///
/// chrono accepts second 60 as a leap second; a log clock never writes one,
/// so it is rejected like any other out-of-range field.
pub(crate) fn parse_timestamp(raw: &str, format: &str) -> Result<NaiveTime, String> {
    let ts = NaiveTime::parse_from_str(raw.trim(), format).map_err(|e| e.to_string())?;
    if ts.nanosecond() >= 1_000_000_000 {
        return Err("leap second is not a valid time of day".to_string());
    }
    Ok(ts)
}
