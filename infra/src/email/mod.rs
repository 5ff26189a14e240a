//! Email Service Module
//!
//! Delivery of passcode emails through an upstream provider.
//!
//! ## Features
//!
//! - **Email Service Trait**: Common interface for all providers
//! - **SendGrid**: v3 mail send API over reqwest, with retry on 429/5xx
//! - **Mock Implementation**: Console output for development
//! - **Adapter**: Bridges any provider to the core delivery trait

pub mod adapter;
pub mod email_service;
pub mod mock_email;
pub mod sendgrid;

pub use adapter::EmailServiceAdapter;
pub use email_service::EmailService;
pub use mock_email::MockEmailService;
pub use sendgrid::SendGridEmailService;


use std::sync::Arc;
use vh_shared::config::{EmailConfig, EmailProvider};

/// Create an email service based on configuration
///
/// Falls back to the mock provider when SendGrid is selected without
/// credentials or its client cannot be built. Configuration validation
/// rejects that combination in production before this is reached.
pub fn create_email_service(config: &EmailConfig) -> Arc<dyn EmailService> {
    match config.provider {
        EmailProvider::SendGrid if config.has_credentials() => {
            match SendGridEmailService::new(config.clone()) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    tracing::error!("Failed to build SendGrid client, using mock: {}", e);
                    Arc::new(MockEmailService::new())
                }
            }
        }
        EmailProvider::SendGrid => {
            tracing::warn!("SendGrid selected without API key or sender, using mock implementation");
            Arc::new(MockEmailService::new())
        }
        EmailProvider::Mock => Arc::new(MockEmailService::new()),
    }
}
