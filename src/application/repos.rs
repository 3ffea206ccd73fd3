//! Source traits describing where the post feed comes from.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("feed responded with status {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Decode(#[from] DomainError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feed location `{location}`: {reason}")]
    InvalidLocation { location: String, reason: String },
}

impl SourceError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn invalid_location(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Retrieves the complete, ordered post feed in a single call.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError>;

    /// Human-readable origin used in log fields.
    fn describe(&self) -> String;
}
