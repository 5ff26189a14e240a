//! Email Service Interface

use async_trait::async_trait;
use vh_core::domain::value_objects::OutgoingEmail;

use crate::InfrastructureError;

/// Email service trait for provider implementations
///
/// Implementations include:
/// - SendGrid v3 API
/// - Mock implementation for development
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Hand a message to the provider
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the accepted message
    /// * `Err(InfrastructureError)` - The provider rejected or could not be reached
    async fn send(&self, email: &OutgoingEmail) -> Result<String, InfrastructureError>;

    /// Provider name for logs, e.g. "SendGrid" or "Mock"
    fn provider_name(&self) -> &str;

    /// Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
