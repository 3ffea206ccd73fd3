use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post feed could not be decoded: {message}")]
    Decode { message: String },
}

impl DomainError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
