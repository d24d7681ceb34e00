pub mod ban;
pub mod error;
pub mod expiration;
