//! One-time passcode lifecycle
//!
//! This module owns issuance, verification, lookup and bulk invalidation of
//! short-lived numeric codes scoped to an (identifier, purpose) pair:
//! - `OtpManager` drives the lifecycle over any `OtpStore`
//! - `OtpEmailTemplate` renders the delivery message per purpose
//! - `OtpCleanupService` purges expired records for stores without native expiry

mod cleanup;
mod config;
mod manager;
mod template;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use cleanup::{CleanupResult, OtpCleanupConfig, OtpCleanupService};
pub use config::OtpManagerConfig;
pub use manager::OtpManager;
pub use template::OtpEmailTemplate;
pub use traits::EmailSenderTrait;
pub use types::DenialReason;
