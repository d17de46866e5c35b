//! SevaSphere daemon library - exposes modules for testing.

pub mod engine;
pub mod prompts;
pub mod routes;
pub mod server;

pub use engine::ChatEngine;
