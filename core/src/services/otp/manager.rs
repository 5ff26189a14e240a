//! Passcode lifecycle manager

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use vh_shared::utils::{mask_email, MAX_IDENTIFIER_LENGTH};

use crate::domain::entities::otp_record::{is_well_formed_code, OtpPurpose, OtpRecord};
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::OtpStore;

use super::config::OtpManagerConfig;
use super::template::OtpEmailTemplate;
use super::traits::EmailSenderTrait;
use super::types::DenialReason;

/// Issues, verifies and invalidates passcodes over an `OtpStore`
///
/// Holds no mutable state of its own; every guarantee about concurrent
/// callers comes from the atomicity of `OtpStore::upsert` and
/// `OtpStore::consume`.
pub struct OtpManager<S: ?Sized> {
    store: Arc<S>,
    config: OtpManagerConfig,
}

impl<S: OtpStore + ?Sized> OtpManager<S> {
    pub fn new(store: Arc<S>, config: OtpManagerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &OtpManagerConfig {
        &self.config
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl()
    }

    /// Issue a fresh code for the pair, replacing any previous record
    ///
    /// # Returns
    ///
    /// * `Ok(OtpRecord)` - The committed record, `used = false`
    /// * `Err(DomainError)` - Validation failure or store failure
    pub async fn issue(&self, identifier: &str, purpose: OtpPurpose) -> DomainResult<OtpRecord> {
        let identifier = Self::check_identifier(identifier)?;
        let record = OtpRecord::new(identifier, purpose, self.ttl());

        self.store.upsert(&record).await.map_err(|e| {
            tracing::error!(
                identifier = %mask_email(identifier),
                purpose = %purpose,
                error = %e,
                event = "otp_store_failed",
                "Failed to store passcode"
            );
            e
        })?;

        tracing::info!(
            identifier = %mask_email(identifier),
            purpose = %purpose,
            otp_id = %record.id,
            expires_at = %record.expires_at,
            event = "otp_issued",
            "Issued new passcode"
        );

        Ok(record)
    }

    /// Issue a code and hand it to the delivery collaborator
    ///
    /// The record is committed before sending. A refused delivery surfaces as
    /// `AuthError::DeliveryFailed` carrying the provider's reason; with
    /// `invalidate_on_delivery_failure` the undelivered record, and only that
    /// record, is also marked used.
    pub async fn issue_and_deliver<E: EmailSenderTrait + ?Sized>(
        &self,
        sender: &E,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<OtpRecord> {
        let record = self.issue(identifier, purpose).await?;
        let email = OtpEmailTemplate::render(
            &record.identifier,
            purpose,
            &record.code,
            self.config.ttl_minutes,
        );

        match sender.send_email(&email).await {
            Ok(message_id) => {
                tracing::info!(
                    identifier = %mask_email(&record.identifier),
                    purpose = %purpose,
                    message_id = %message_id,
                    event = "otp_delivered",
                    "Passcode accepted by email provider"
                );
                Ok(record)
            }
            Err(reason) => {
                tracing::warn!(
                    identifier = %mask_email(&record.identifier),
                    purpose = %purpose,
                    reason = %reason,
                    event = "otp_delivery_failed",
                    "Email provider refused passcode message"
                );

                if self.config.invalidate_on_delivery_failure {
                    match self.store.invalidate_issued(&record).await {
                        Ok(true) => {}
                        Ok(false) => tracing::debug!(
                            identifier = %mask_email(&record.identifier),
                            purpose = %purpose,
                            otp_id = %record.id,
                            "Undelivered passcode already replaced or used"
                        ),
                        Err(e) => tracing::error!(
                            identifier = %mask_email(&record.identifier),
                            purpose = %purpose,
                            error = %e,
                            event = "otp_invalidate_failed",
                            "Undelivered passcode is still active"
                        ),
                    }
                }

                Err(AuthError::DeliveryFailed { reason }.into())
            }
        }
    }

    /// Consume a code if it matches an active record for the pair
    ///
    /// Returns `Ok(false)` for every kind of denial; the cause is only logged.
    /// A code succeeds at most once, even under concurrent calls.
    pub async fn verify(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<bool> {
        let identifier = Self::check_identifier(identifier)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "code".to_string(),
            }
            .into());
        }

        if !is_well_formed_code(code) {
            Self::log_denial(identifier, purpose, DenialReason::MalformedCode);
            return Ok(false);
        }

        let now = Utc::now();
        if self.store.consume(identifier, code, purpose, now).await? {
            tracing::info!(
                identifier = %mask_email(identifier),
                purpose = %purpose,
                event = "otp_verified",
                "Passcode verified"
            );
            return Ok(true);
        }

        let reason = self.classify_denial(identifier, code, purpose, now).await;
        Self::log_denial(identifier, purpose, reason);
        Ok(false)
    }

    /// Whether an unused, unexpired code exists for the pair
    pub async fn has_active(&self, identifier: &str, purpose: OtpPurpose) -> DomainResult<bool> {
        let identifier = Self::check_identifier(identifier)?;
        let active = self
            .store
            .find_active(identifier, purpose, Utc::now())
            .await?;
        Ok(active.is_some())
    }

    /// Mark every unused code for the pair as used, expired or not
    pub async fn invalidate_all(&self, identifier: &str, purpose: OtpPurpose) -> DomainResult<u64> {
        let identifier = Self::check_identifier(identifier)?;
        let count = self.store.invalidate_all(identifier, purpose).await?;

        tracing::info!(
            identifier = %mask_email(identifier),
            purpose = %purpose,
            invalidated = count,
            event = "otp_invalidated",
            "Invalidated outstanding passcodes"
        );

        Ok(count)
    }

    fn check_identifier(identifier: &str) -> DomainResult<&str> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "identifier".to_string(),
            }
            .into());
        }

        let length = trimmed.chars().count();
        if length > MAX_IDENTIFIER_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "identifier".to_string(),
                max: MAX_IDENTIFIER_LENGTH,
                actual: length,
            }
            .into());
        }

        Ok(trimmed)
    }

    async fn classify_denial(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> DenialReason {
        match self.store.find(identifier, purpose).await {
            Ok(None) => DenialReason::NotFound,
            Ok(Some(record)) if !constant_time_eq(record.code.as_bytes(), code.as_bytes()) => {
                DenialReason::CodeMismatch
            }
            Ok(Some(record)) if record.used => DenialReason::AlreadyUsed,
            Ok(Some(record)) if record.is_expired_at(now) => DenialReason::Expired,
            Ok(Some(_)) => DenialReason::Contended,
            Err(e) => {
                tracing::debug!(error = %e, "Denial classification lookup failed");
                DenialReason::Unknown
            }
        }
    }

    fn log_denial(identifier: &str, purpose: OtpPurpose, reason: DenialReason) {
        tracing::warn!(
            identifier = %mask_email(identifier),
            purpose = %purpose,
            reason = reason.as_str(),
            event = "otp_verification_denied",
            "Passcode verification denied"
        );
    }
}
