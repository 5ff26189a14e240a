pub mod otp;
pub mod user;

pub use otp::{InMemoryOtpStore, OtpStore};
pub use user::{InMemoryUserRepository, UserRepository};
