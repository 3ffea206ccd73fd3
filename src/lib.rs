//! Incremental post loading, free-text search and topic filtering for
//! static blog listings.

pub mod application;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
