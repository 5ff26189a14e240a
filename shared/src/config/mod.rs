//! Configuration module with business-specific sub-modules
//!
//! Every section is read from environment variables with a sensible default:
//! - `auth` - Password hashing and user store selection
//! - `cache` - Redis connection settings
//! - `database` - MySQL connection and pool settings
//! - `email` - Delivery provider and sender identity
//! - `environment` - Environment detection and logging
//! - `otp` - Passcode lifetime, store backend and cleanup
//! - `server` - HTTP server and CORS

pub mod auth;
pub mod cache;
pub mod database;
pub mod email;
pub mod environment;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{AuthConfig, UserStoreBackend};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProvider};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{OtpConfig, OtpStoreBackend};
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub otp: OtpConfig,
    pub email: EmailConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            otp: OtpConfig::default(),
            email: EmailConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            cors: CorsConfig::from_env(environment),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            otp: OtpConfig::from_env(),
            email: EmailConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Check cross-section consistency before the server starts.
    ///
    /// Returns every problem found rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.otp.ttl_minutes <= 0 {
            problems.push(format!("OTP_TTL_MINUTES must be positive, got {}", self.otp.ttl_minutes));
        }
        if self.otp.cleanup_enabled && self.otp.cleanup_interval_seconds == 0 {
            problems.push("OTP_CLEANUP_INTERVAL_SECONDS must be greater than zero".to_string());
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            problems.push(format!("BCRYPT_COST must be between 4 and 31, got {}", self.auth.bcrypt_cost));
        }
        if self.email.provider == EmailProvider::SendGrid {
            if self.email.api_key.is_empty() {
                problems.push("SENDGRID_API_KEY is required when EMAIL_PROVIDER=sendgrid".to_string());
            }
            if self.email.from_email.is_empty() {
                problems.push("SENDGRID_FROM_EMAIL is required when EMAIL_PROVIDER=sendgrid".to_string());
            }
        } else if self.environment.is_production() {
            problems.push("the mock email provider cannot be used in production".to_string());
        }
        if self.environment.is_production() && self.otp.store == OtpStoreBackend::Memory {
            problems.push("OTP_STORE=memory cannot be used in production".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
