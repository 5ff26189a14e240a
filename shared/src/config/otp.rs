//! One-time passcode configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Backing store for passcode records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpStoreBackend {
    #[default]
    Memory,
    Mysql,
    Redis,
}

impl OtpStoreBackend {
    /// Redis expires keys by itself; the other backends need a purge loop.
    pub fn has_native_expiry(&self) -> bool {
        matches!(self, OtpStoreBackend::Redis)
    }
}

impl std::str::FromStr for OtpStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(OtpStoreBackend::Memory),
            "mysql" => Ok(OtpStoreBackend::Mysql),
            "redis" => Ok(OtpStoreBackend::Redis),
            _ => Err(format!("Invalid OTP store: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Lifetime of an issued code in minutes
    pub ttl_minutes: i64,

    pub store: OtpStoreBackend,

    /// Mark a freshly issued code as used when its delivery fails
    #[serde(default = "default_invalidate_on_delivery_failure")]
    pub invalidate_on_delivery_failure: bool,

    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,

    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 15,
            store: OtpStoreBackend::default(),
            invalidate_on_delivery_failure: default_invalidate_on_delivery_failure(),
            cleanup_enabled: default_cleanup_enabled(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_minutes: env_or("OTP_TTL_MINUTES", defaults.ttl_minutes),
            store: env_or("OTP_STORE", defaults.store),
            invalidate_on_delivery_failure: env_or(
                "OTP_INVALIDATE_ON_DELIVERY_FAILURE",
                defaults.invalidate_on_delivery_failure,
            ),
            cleanup_enabled: env_or("OTP_CLEANUP_ENABLED", defaults.cleanup_enabled),
            cleanup_interval_seconds: env_or(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
        }
    }
}

fn default_invalidate_on_delivery_failure() -> bool {
    true
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.ttl_minutes, 15);
        assert_eq!(config.store, OtpStoreBackend::Memory);
        assert!(config.invalidate_on_delivery_failure);
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("MySQL".parse::<OtpStoreBackend>().unwrap(), OtpStoreBackend::Mysql);
        assert_eq!("redis".parse::<OtpStoreBackend>().unwrap(), OtpStoreBackend::Redis);
        assert!("mongo".parse::<OtpStoreBackend>().is_err());
        assert!(OtpStoreBackend::Redis.has_native_expiry());
        assert!(!OtpStoreBackend::Mysql.has_native_expiry());
    }
}
