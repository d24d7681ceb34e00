use thiserror::Error;

use domain::{ban::BanAccessError, error::DomainError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    BanAccess(#[from] BanAccessError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },
}

pub type AppResult<T> = Result<T, AppError>;
