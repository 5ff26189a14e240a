//! Account flows built on the passcode lifecycle
//!
//! Registration, login and password reset for email-identified accounts.
//! Passcodes gate registration start and password reset; passwords are
//! stored only as bcrypt hashes.

mod config;
mod password;
mod service;


pub use config::AuthServiceConfig;
pub use password::PasswordHasher;
pub use service::AuthService;
