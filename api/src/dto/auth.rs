use serde::{Deserialize, Serialize};
use validator::Validate;
use vh_core::domain::entities::user::UserProfile;

// Missing fields deserialize to empty strings so the required-field checks
// below produce the error instead of the JSON extractor.

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,

    /// Submitted code; format is checked by the passcode manager
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "OTP is required"))]
    pub otp: String,

    /// REGISTRATION, PASSWORD_RESET or EMAIL_VERIFICATION
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub otp_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "OTP is required"))]
    pub otp: String,

    #[serde(default, rename = "newPassword", alias = "new_password")]
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserProfile,
}
