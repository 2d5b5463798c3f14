use thiserror::Error;

use crate::{config::LoadError, infra::error::InfraError, infra::links::EventDocumentError};

/// Errors that end the process. Invalidation failures never show up here;
/// they are reported as an unacknowledged result instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("invalid event document: {0}")]
    Input(#[from] EventDocumentError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 78,
            AppError::Input(_) => 65,
            AppError::Infra(InfraError::Io(_)) => 74,
            AppError::Infra(_) | AppError::Unexpected(_) => 1,
        }
    }
}
