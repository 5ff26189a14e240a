//! SendGrid v3 mail send client
//!
//! A 202 response means SendGrid accepted the message. 429 and 5xx responses
//! and transport failures are retried with exponential backoff; any other
//! status is a rejection whose reason comes from the response `errors` array.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vh_core::domain::value_objects::OutgoingEmail;
use vh_shared::config::EmailConfig;
use vh_shared::utils::email::mask_email;

use super::email_service::EmailService;
use crate::InfrastructureError;

const SEND_PATH: &str = "/v3/mail/send";
const MESSAGE_ID_HEADER: &str = "x-message-id";
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct SendGridErrorBody {
    #[serde(default)]
    errors: Vec<SendGridErrorItem>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorItem {
    message: Option<String>,
    field: Option<String>,
}

pub struct SendGridEmailService {
    client: Client,
    config: EmailConfig,
    retry_delay: Duration,
}

impl SendGridEmailService {
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        if !config.has_credentials() {
            return Err(InfrastructureError::Config(
                "SendGrid requires SENDGRID_API_KEY and SENDGRID_FROM_EMAIL".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Override the base backoff between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), SEND_PATH)
    }

    /// JSON body for the mail send endpoint
    pub(crate) fn build_payload(&self, email: &OutgoingEmail) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": {
                "email": self.config.from_email,
                "name": self.config.from_name,
            },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html },
            ],
        })
    }

    async fn attempt(&self, payload: &Value) -> Result<Attempt, reqwest::Error> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .headers()
                .get(MESSAGE_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| format!("sendgrid_{}", Uuid::new_v4()));
            return Ok(Attempt::Accepted(message_id));
        }

        let body = response.text().await.unwrap_or_default();
        let reason = parse_error_reason(status, &body);
        if is_retriable_status(status) {
            Ok(Attempt::Retry(reason))
        } else {
            Ok(Attempt::Rejected(reason))
        }
    }
}

enum Attempt {
    Accepted(String),
    Retry(String),
    Rejected(String),
}

/// Rate limiting and provider-side failures
pub(crate) fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Human-readable failure reason from a SendGrid error response
pub(crate) fn parse_error_reason(status: StatusCode, body: &str) -> String {
    let messages: Vec<String> = serde_json::from_str::<SendGridErrorBody>(body)
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .filter_map(|item| match (item.message, item.field) {
                    (Some(message), Some(field)) => Some(format!("{} ({})", message, field)),
                    (Some(message), None) => Some(message),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        format!("SendGrid returned HTTP {}", status.as_u16())
    } else {
        messages.join("; ")
    }
}

#[async_trait]
impl EmailService for SendGridEmailService {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, InfrastructureError> {
        let payload = self.build_payload(email);
        let masked = mask_email(&email.to);
        let max_attempts = self.config.max_retries + 1;
        let mut delay = self.retry_delay;
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(recipient = %masked, attempt = attempts, "Sending email via SendGrid");

            let reason = match self.attempt(&payload).await {
                Ok(Attempt::Accepted(message_id)) => {
                    info!(
                        target: "email_service",
                        provider = "sendgrid",
                        recipient = %masked,
                        message_id = %message_id,
                        "Email accepted"
                    );
                    return Ok(message_id);
                }
                Ok(Attempt::Rejected(reason)) => {
                    warn!(recipient = %masked, reason = %reason, "SendGrid rejected email");
                    return Err(InfrastructureError::Email(reason));
                }
                Ok(Attempt::Retry(reason)) => reason,
                Err(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                    format!("SendGrid request failed: {}", e)
                }
                Err(e) => return Err(InfrastructureError::Http(e)),
            };

            if attempts >= max_attempts {
                warn!(
                    recipient = %masked,
                    attempts = attempts,
                    reason = %reason,
                    "SendGrid delivery failed after retries"
                );
                return Err(InfrastructureError::Email(reason));
            }

            warn!(
                "SendGrid attempt {}/{} failed: {}. Retrying in {}ms...",
                attempts,
                max_attempts,
                reason,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
        }
    }

    fn provider_name(&self) -> &str {
        "SendGrid"
    }
}
