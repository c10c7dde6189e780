// DaocLog - app/mod.rs
//
// Application layer: template management and run orchestration.
// Depends on core, platform, and util.

pub mod run;
pub mod template_mgr;
