//! Persistence contract for one-time passcode records.
//!
//! A store keeps at most one record per (identifier, purpose) pair. The two
//! mutating operations that decide security outcomes, `upsert` and `consume`,
//! must each be a single atomic step in the backing store: no read followed
//! by a separate write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Idempotent schema/index setup, run once at process start
    async fn ensure_schema(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Insert the record, fully replacing any existing record for the same
    /// (identifier, purpose) pair
    async fn upsert(&self, record: &OtpRecord) -> Result<(), DomainError>;

    /// Atomically mark the matching record used
    ///
    /// Matches identifier, exact code, purpose, `used = false` and
    /// `expires_at > now`. Returns `true` only for the single caller whose
    /// update flipped the flag.
    async fn consume(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// The active record for the pair, if any
    async fn find_active(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// The stored record for the pair in whatever state it is in
    async fn find(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Mark every unused record for the pair as used, ignoring expiry.
    /// Returns the number of records changed.
    async fn invalidate_all(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError>;

    /// Mark `record` used only if it is still the stored record for its pair
    /// (same `id`) and unused. A record that has since been replaced by a
    /// newer issuance is left alone. Returns whether the flag was flipped.
    async fn invalidate_issued(&self, record: &OtpRecord) -> Result<bool, DomainError>;

    /// Delete records whose expiry has passed. Returns the number deleted.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
