//! # VerifyHub Core
//!
//! Core business logic and domain layer for VerifyHub.
//! This crate contains the passcode and user entities, the store and
//! repository interfaces with in-memory implementations, the passcode
//! lifecycle manager, the account service, and the error types shared by
//! every layer above it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{generate_code, OtpPurpose, OtpRecord, OtpStatus, User, UserProfile};
pub use domain::value_objects::OutgoingEmail;
pub use errors::{AuthError, DomainError, DomainResult, ValidationError};
pub use repositories::{InMemoryOtpStore, InMemoryUserRepository, OtpStore, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, EmailSenderTrait, OtpCleanupConfig, OtpCleanupService,
    OtpManager, OtpManagerConfig,
};
