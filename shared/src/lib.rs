//! Shared utilities and common types for VerifyHub
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - Validation helpers (email, password policy, usernames)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, EmailConfig, EmailProvider,
    Environment, LogFormat, LoggingConfig, OtpConfig, OtpStoreBackend, ServerConfig,
    UserStoreBackend,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::{email, password, validation};
