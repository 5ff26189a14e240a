//! Email delivery configuration

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    #[default]
    Mock,
    SendGrid,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(EmailProvider::Mock),
            "sendgrid" => Ok(EmailProvider::SendGrid),
            _ => Err(format!("Invalid email provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,

    /// Provider API key
    #[serde(default, skip_serializing)]
    pub api_key: String,

    pub from_email: String,
    pub from_name: String,

    /// Provider base URL, overridable for testing against a local stub
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries on rate limiting or provider-side errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            api_key: String::new(),
            from_email: String::from("no-reply@verifyhub.local"),
            from_name: String::from("VerifyHub"),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("EMAIL_PROVIDER", defaults.provider),
            api_key: env_string("SENDGRID_API_KEY", ""),
            from_email: env_string("SENDGRID_FROM_EMAIL", &defaults.from_email),
            from_name: env_string("SENDGRID_FROM", &defaults.from_name),
            api_base_url: env_string("SENDGRID_API_BASE_URL", &defaults.api_base_url),
            timeout_seconds: env_or("EMAIL_TIMEOUT_SECONDS", defaults.timeout_seconds),
            max_retries: env_or("EMAIL_MAX_RETRIES", defaults.max_retries),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.from_email.is_empty()
    }
}

fn default_api_base_url() -> String {
    String::from("https://api.sendgrid.com")
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}
