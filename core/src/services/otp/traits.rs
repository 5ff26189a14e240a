//! Collaborator traits for the passcode lifecycle

use async_trait::async_trait;

use crate::domain::value_objects::OutgoingEmail;

/// Delivery collaborator
///
/// Success means the upstream provider accepted the message, not that it
/// reached the inbox.
#[async_trait]
pub trait EmailSenderTrait: Send + Sync {
    /// Returns the provider message id, or the provider's failure reason
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String, String>;
}
