use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid ban mode: {0:?}")]
    InvalidBanMode(String),
}
