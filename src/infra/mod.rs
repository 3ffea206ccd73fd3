//! Infrastructure adapters and runtime bootstrap.

pub mod document;
pub mod error;
pub mod sources;
#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
#[cfg(target_arch = "wasm32")]
pub mod web;
