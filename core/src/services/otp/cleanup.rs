//! Periodic purge of expired passcode records
//!
//! Stores without native expiry (MySQL, in-memory) keep expired rows until
//! something deletes them. Expired rows are already inert for verification;
//! this only reclaims space.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use vh_shared::config::OtpConfig;

use crate::errors::DomainError;
use crate::repositories::OtpStore;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled && !config.store.has_native_expiry(),
        }
    }
}

pub struct OtpCleanupService<S: OtpStore + ?Sized + 'static> {
    store: Arc<S>,
    config: OtpCleanupConfig,
}

impl<S: OtpStore + ?Sized + 'static> OtpCleanupService<S> {
    pub fn new(store: Arc<S>, config: OtpCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let purged = self.store.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged = purged, event = "otp_purged", "Deleted expired passcode records");
        }

        Ok(CleanupResult {
            expired_records_deleted: purged,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Passcode cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Passcode cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Passcode cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupResult {
    pub expired_records_deleted: u64,
}
