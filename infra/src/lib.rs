//! # Infrastructure Layer
//!
//! Concrete implementations of the core traits for VerifyHub:
//! - **Database**: MySQL passcode store and user repository using SQLx
//! - **Cache**: Redis passcode store with native key expiry
//! - **Email**: SendGrid delivery and a console mock for development

use vh_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and passcode store
pub mod cache;

/// Email module - delivery providers
pub mod email;

/// Infrastructure layer errors
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Email provider refused or failed the request
    #[error("Email service error: {0}")]
    Email(String),

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Internal { message },
            other => DomainError::Persistence {
                message: other.to_string(),
            },
        }
    }
}
