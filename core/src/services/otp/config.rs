//! Configuration for the passcode lifecycle

use chrono::Duration;
use vh_shared::config::OtpConfig;

use crate::domain::entities::otp_record::DEFAULT_EXPIRATION_MINUTES;

#[derive(Debug, Clone)]
pub struct OtpManagerConfig {
    /// Code lifetime in minutes
    pub ttl_minutes: i64,
    /// Mark a freshly issued code used when its delivery fails
    pub invalidate_on_delivery_failure: bool,
}

impl Default for OtpManagerConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_EXPIRATION_MINUTES,
            invalidate_on_delivery_failure: true,
        }
    }
}

impl OtpManagerConfig {
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }
}

impl From<&OtpConfig> for OtpManagerConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ttl_minutes: config.ttl_minutes,
            invalidate_on_delivery_failure: config.invalidate_on_delivery_failure,
        }
    }
}
