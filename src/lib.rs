// DaocLog - lib.rs
//
// Library entry point, exposing all modules for integration testing
// and programmatic use. The binary in main.rs is CLI glue only.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

pub use crate::core::classifier::{classify_line, Classifier};
pub use crate::core::model::{CombatEvent, DamageEvent, HealingEvent};
