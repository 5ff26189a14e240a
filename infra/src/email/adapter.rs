//! Bridge from infrastructure email providers to the core delivery trait

use async_trait::async_trait;
use std::sync::Arc;

use vh_core::domain::value_objects::OutgoingEmail;
use vh_core::services::otp::EmailSenderTrait;

use super::email_service::EmailService;
use crate::InfrastructureError;

/// Exposes an `EmailService` as the core `EmailSenderTrait`
///
/// Provider errors become the plain failure reason the core reports upward.
pub struct EmailServiceAdapter<T: EmailService + ?Sized> {
    inner: Arc<T>,
}

impl<T: EmailService + ?Sized> EmailServiceAdapter<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl<T: EmailService + ?Sized> EmailSenderTrait for EmailServiceAdapter<T> {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String, String> {
        self.inner.send(email).await.map_err(|e| match e {
            InfrastructureError::Email(reason) => reason,
            other => other.to_string(),
        })
    }
}
