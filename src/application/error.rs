use thiserror::Error;

use crate::application::repos::SourceError;
use crate::infra::error::InfraError;
use crate::presentation::views::TemplateRenderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("post feed unavailable: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
