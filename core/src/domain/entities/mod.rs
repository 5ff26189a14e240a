//! Domain entities representing core business objects.

pub mod otp_record;
pub mod user;

pub use otp_record::{
    generate_code, is_well_formed_code, OtpPurpose, OtpRecord, OtpStatus, CODE_LENGTH,
    DEFAULT_EXPIRATION_MINUTES,
};
pub use user::{User, UserProfile};
