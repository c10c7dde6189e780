// DaocLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveTime;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Combat events (output of classification)
// =============================================================================

/// A line in which an actor dealt a quantified amount of damage to a target.
///
/// Built fresh for every matching line and handed straight to the caller;
/// it is a value with no identity and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamageEvent {
    /// Time of day from the bracketed line prefix. No date, no timezone.
    pub timestamp: NaiveTime,

    /// The actor that dealt the damage ("You" for the log owner).
    pub source: String,

    /// The damaged entity, trimmed, with any leading "the " article removed.
    pub target: String,

    /// Damage dealt, parsed from base-10 digits.
    pub damage_amount: u64,

    /// Damage category word (e.g. "slash"), or "Unknown" when the line has none.
    pub damage_type: String,
}

impl fmt::Display for DamageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} hit {} for {} {} damage",
            self.timestamp.format("%H:%M:%S"),
            self.source,
            self.target,
            self.damage_amount,
            self.damage_type
        )
    }
}

/// A line in which an actor restored health to a target.
///
/// No shipped template kind produces this yet. It exists so a healing
/// grammar can be added as a new `TemplateKind` variant without reshaping
/// `CombatEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealingEvent {
    pub timestamp: NaiveTime,
    pub source: String,
    pub target: String,
    pub healing_amount: u64,
}

impl fmt::Display for HealingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} healed {} for {} hit points",
            self.timestamp.format("%H:%M:%S"),
            self.source,
            self.target,
            self.healing_amount
        )
    }
}

/// Every structured event the classifier can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatEvent {
    Damage(DamageEvent),
    Healing(HealingEvent),
}

impl CombatEvent {
    pub fn timestamp(&self) -> NaiveTime {
        match self {
            CombatEvent::Damage(e) => e.timestamp,
            CombatEvent::Healing(e) => e.timestamp,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            CombatEvent::Damage(e) => &e.source,
            CombatEvent::Healing(e) => &e.source,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            CombatEvent::Damage(e) => &e.target,
            CombatEvent::Healing(e) => &e.target,
        }
    }

    /// Short label used in tabular output.
    pub fn kind_label(&self) -> &'static str {
        match self {
            CombatEvent::Damage(_) => "damage",
            CombatEvent::Healing(_) => "healing",
        }
    }

    /// Returns the damage payload, if this is a damage event.
    pub fn as_damage(&self) -> Option<&DamageEvent> {
        match self {
            CombatEvent::Damage(e) => Some(e),
            CombatEvent::Healing(_) => None,
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::Damage(e) => e.fmt(f),
            CombatEvent::Healing(e) => e.fmt(f),
        }
    }
}

// =============================================================================
// Line template (runtime representation)
// =============================================================================

/// Which event a template's grammar describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// An actor dealing damage to a target.
    #[default]
    Damage,
}

impl TemplateKind {
    /// Named capture groups the grammar pattern must define.
    pub fn required_groups(&self) -> &'static [&'static str] {
        match self {
            TemplateKind::Damage => crate::util::constants::REQUIRED_DAMAGE_GROUPS,
        }
    }
}

/// Runtime representation of a line template after TOML parsing and
/// regex compilation. This is what the classifier uses for each line.
///
/// Built from `TemplateDefinition` (the raw TOML structure) via validation.
#[derive(Debug, Clone)]
pub struct LineTemplate {
    /// Unique template identifier (e.g. "daoc-damage-dealt").
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Template schema version.
    pub version: String,

    /// Description of what lines this template recognises.
    pub description: String,

    /// Event kind produced on a match.
    pub kind: TemplateKind,

    /// Compiled grammar, anchored at line start.
    /// Named capture groups: timestamp, target, amount, damage_type, source.
    pub pattern: regex::Regex,

    /// chrono format string for the timestamp capture group.
    pub timestamp_format: String,

    /// Actor used when the pattern has no `source` capture group.
    pub source: String,

    /// Whether this is a built-in template (true) or user-defined (false).
    pub is_builtin: bool,
}
