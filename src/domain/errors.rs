// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unsupported response type: {0}")]
    UnsupportedResponseType(String),
    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),
    #[error("invalid scope: {0}")]
    InvalidScope(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
