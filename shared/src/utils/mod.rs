//! Common utility functions

pub mod email;
pub mod password;
pub mod validation;

pub use email::{is_valid_email, mask_email, normalize_email};
pub use password::{validate_password, PasswordValidation};
pub use validation::{validate_username, MAX_IDENTIFIER_LENGTH, MIN_USERNAME_LENGTH};
