//! Authentication route handlers
//!
//! - Registration passcode (send and verify)
//! - Account creation and login
//! - Password reset (request and confirm)

pub mod login;
pub mod register;
pub mod reset_password;
pub mod send_otp;
pub mod verify_otp;

use std::sync::Arc;

use vh_core::repositories::{OtpStore, UserRepository};
use vh_core::services::{AuthService, EmailSenderTrait};

/// Account service with backends chosen at startup
pub type DynAuthService = AuthService<dyn UserRepository, dyn OtpStore, dyn EmailSenderTrait>;

/// Application state that holds shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<DynAuthService>,
}

impl AppState {
    pub fn new(auth_service: Arc<DynAuthService>) -> Self {
        Self { auth_service }
    }
}
