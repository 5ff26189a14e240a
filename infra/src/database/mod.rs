//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Passcode store with atomic upsert and conditional consume
//! - User repository
//!
//! Each store creates its own tables idempotently at startup.

pub mod connection;
pub mod otp_store;
pub mod user_repository;


pub use connection::DatabasePool;
pub use otp_store::MySqlOtpStore;
pub use user_repository::MySqlUserRepository;

use tracing::error;
use vh_core::errors::DomainError;

/// Log a failed query and map it to a persistence failure
pub(crate) fn db_error(operation: &'static str, e: sqlx::Error) -> DomainError {
    error!(operation = operation, error = %e, "Database operation failed");
    DomainError::Persistence {
        message: format!("{} failed: {}", operation, e),
    }
}
