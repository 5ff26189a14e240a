//! Delivery message rendering per passcode purpose

use crate::domain::entities::otp_record::OtpPurpose;
use crate::domain::value_objects::OutgoingEmail;

pub struct OtpEmailTemplate;

impl OtpEmailTemplate {
    /// Build the message carrying `code` to `to`
    pub fn render(to: &str, purpose: OtpPurpose, code: &str, ttl_minutes: i64) -> OutgoingEmail {
        let (subject, heading, intro, label) = match purpose {
            OtpPurpose::Registration => (
                "Your Registration Verification Code",
                "Registration Verification",
                "Thank you for registering. Please use the following verification code to complete your registration:",
                "registration verification code",
            ),
            OtpPurpose::PasswordReset => (
                "Password Reset Request",
                "Password Reset",
                "We received a request to reset your password. Please use the following code to continue:",
                "password reset code",
            ),
            OtpPurpose::EmailVerification => (
                "Verify Your Email Address",
                "Email Verification",
                "Please use the following code to verify your email address:",
                "email verification code",
            ),
        };

        let expiry = format!(
            "This code will expire in {} {}.",
            ttl_minutes,
            if ttl_minutes == 1 { "minute" } else { "minutes" }
        );
        let ignore = "If you didn't request this code, please ignore this email.";

        let text = format!("Your {} is: {}\n\n{}\n\n{}", label, code, expiry, ignore);
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">{heading}</h2>
  <p>{intro}</p>
  <div style="background-color: #f4f4f4; padding: 15px; border-radius: 5px; text-align: center; font-size: 24px; letter-spacing: 5px; margin: 20px 0;">
    <strong>{code}</strong>
  </div>
  <p>{expiry}</p>
  <p>{ignore}</p>
</div>"#
        );

        OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            text,
            html,
        }
    }
}
