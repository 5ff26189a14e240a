//! One-time passcode record scoped to an (identifier, purpose) pair.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

/// Length of every issued code
pub const CODE_LENGTH: usize = 6;

/// Exclusive upper bound of the numeric code space
const CODE_SPACE: u32 = 1_000_000;

/// Default lifetime of an issued code (15 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 15;

/// What a passcode may authorize. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    Registration,
    PasswordReset,
    EmailVerification,
}

impl OtpPurpose {
    pub const ALL: [OtpPurpose; 3] = [
        OtpPurpose::Registration,
        OtpPurpose::PasswordReset,
        OtpPurpose::EmailVerification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "REGISTRATION",
            OtpPurpose::PasswordReset => "PASSWORD_RESET",
            OtpPurpose::EmailVerification => "EMAIL_VERIFICATION",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OtpPurpose::ALL
            .into_iter()
            .find(|purpose| purpose.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPurpose {
                value: s.to_string(),
            })
    }
}

/// Derived lifecycle state of a record at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpStatus {
    Active,
    Consumed,
    Expired,
}

/// Produce a uniformly distributed six digit code from the operating system CSPRNG.
///
/// `gen_range` rejects samples outside the largest multiple of the range, so
/// every value in `000000..=999999` is equally likely.
pub fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(0..CODE_SPACE);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Check that a claimed code has the shape of an issued one
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// A single issued passcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub id: Uuid,

    /// Subject the code was issued for, usually an email address
    pub identifier: String,

    /// The zero-padded six digit code
    pub code: String,

    pub purpose: OtpPurpose,

    pub expires_at: DateTime<Utc>,

    /// Flips to true once, on successful verification or bulk invalidation
    pub used: bool,

    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a fresh record with a newly generated code
    ///
    /// # Arguments
    ///
    /// * `identifier` - Subject the code is bound to
    /// * `purpose` - What the code may authorize
    /// * `ttl` - Lifetime measured from now
    pub fn new(identifier: impl Into<String>, purpose: OtpPurpose, ttl: Duration) -> Self {
        Self::issued_at(identifier, purpose, generate_code(), Utc::now(), ttl)
    }

    /// Creates a record with an explicit code and issuance time
    pub fn issued_at(
        identifier: impl Into<String>,
        purpose: OtpPurpose,
        code: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            code: code.into(),
            purpose,
            expires_at: issued_at + ttl,
            used: false,
            created_at: issued_at,
        }
    }

    /// Expired once `now` is at or past `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Unused and not expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired_at(now)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> OtpStatus {
        if self.used {
            OtpStatus::Consumed
        } else if self.is_expired_at(now) {
            OtpStatus::Expired
        } else {
            OtpStatus::Active
        }
    }
}
