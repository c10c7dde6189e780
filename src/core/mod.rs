// DaocLog - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or open files directly.

pub mod classifier;
pub mod export;
pub mod model;
pub mod stream;
pub mod template;
