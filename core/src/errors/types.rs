//! Error types for passcode and account operations.
//!
//! Messages here are for logs and API fallbacks; the presentation layer
//! chooses the wording shown to end users.

use thiserror::Error;

/// Authentication and account errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email format: {email}")]
    InvalidEmailFormat { email: String },

    /// Single denial for wrong, expired, already used or missing codes
    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,

    /// The code was issued and committed, but the provider refused the message
    #[error("Failed to deliver verification code: {reason}")]
    DeliveryFailed { reason: String },

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password does not meet requirements")]
    WeakPassword { violations: Vec<String> },
}

/// Input validation errors, raised before any store access
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field} (max: {max}, actual: {actual})")]
    InvalidLength {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Unknown OTP purpose: {value}")]
    UnknownPurpose { value: String },
}
