//! Business services containing domain logic and use cases.

pub mod auth;
pub mod otp;

pub use auth::{AuthService, AuthServiceConfig, PasswordHasher};
pub use otp::{
    CleanupResult, DenialReason, EmailSenderTrait, OtpCleanupConfig, OtpCleanupService,
    OtpEmailTemplate, OtpManager, OtpManagerConfig,
};
