//! Main account service implementation

use std::sync::Arc;
use vh_shared::utils::{is_valid_email, mask_email, normalize_email, validate_password, validate_username};

use crate::domain::entities::otp_record::OtpPurpose;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{OtpStore, UserRepository};
use crate::services::otp::{EmailSenderTrait, OtpManager};

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;

/// Account service covering registration, login and password reset
pub struct AuthService<U: ?Sized, S: ?Sized, E: ?Sized> {
    /// User repository for account persistence
    user_repository: Arc<U>,
    /// Passcode lifecycle
    otp_manager: Arc<OtpManager<S>>,
    /// Delivery collaborator for passcode emails
    email_sender: Arc<E>,
    hasher: PasswordHasher,
}

impl<U, S, E> AuthService<U, S, E>
where
    U: UserRepository + ?Sized,
    S: OtpStore + ?Sized,
    E: EmailSenderTrait + ?Sized,
{
    /// Create a new account service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `otp_manager` - Passcode lifecycle manager
    /// * `email_sender` - Delivery collaborator
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        otp_manager: Arc<OtpManager<S>>,
        email_sender: Arc<E>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            otp_manager,
            email_sender,
            hasher: PasswordHasher::new(config.bcrypt_cost),
        }
    }

    pub fn otp_manager(&self) -> &OtpManager<S> {
        &self.otp_manager
    }

    /// Send a registration code to an email with no existing account
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code issued and accepted by the email provider
    /// * `Err(AuthError::UserAlreadyExists)` - An account already uses this email
    /// * `Err(AuthError::DeliveryFailed)` - Code issued but the provider refused it
    pub async fn start_registration(&self, email: &str) -> DomainResult<()> {
        let email = Self::check_email(email)?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            tracing::info!(
                email = %mask_email(&email),
                event = "registration_rejected",
                "Registration requested for existing account"
            );
            return Err(AuthError::UserAlreadyExists.into());
        }

        self.otp_manager
            .issue_and_deliver(&*self.email_sender, &email, OtpPurpose::Registration)
            .await?;
        Ok(())
    }

    /// Consume a passcode. Any denial becomes `AuthError::InvalidVerificationCode`.
    pub async fn verify_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> DomainResult<()> {
        let email = Self::check_email(email)?;

        if self.otp_manager.verify(&email, code, purpose).await? {
            Ok(())
        } else {
            Err(AuthError::InvalidVerificationCode.into())
        }
    }

    /// Create an account
    pub async fn register(&self, email: &str, username: &str, password: &str) -> DomainResult<User> {
        let email = Self::check_email(email)?;
        let username = validate_username(username)
            .map_err(|message| DomainError::Validation { message })?;
        Self::check_password_policy(password)?;

        if self.user_repository.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken.into());
        }
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .user_repository
            .create(User::new(email, username, password_hash))
            .await?;

        tracing::info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            event = "user_registered",
            "Registered new user"
        );

        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = Self::check_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!(email = %mask_email(&email), event = "login_failed", "Unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, event = "login_failed", "Wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        tracing::info!(user_id = %user.id, event = "login_succeeded", "User logged in");
        Ok(user)
    }

    /// Send a password reset code if the account exists
    ///
    /// Succeeds without sending anything for unknown emails so callers cannot
    /// probe which addresses are registered. Delivery failures are still
    /// returned; the caller decides what to show.
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<()> {
        let email = Self::check_email(email)?;

        if self.user_repository.find_by_email(&email).await?.is_none() {
            tracing::info!(
                email = %mask_email(&email),
                event = "password_reset_unknown_account",
                "Password reset requested for unknown email"
            );
            return Ok(());
        }

        self.otp_manager
            .issue_and_deliver(&*self.email_sender, &email, OtpPurpose::PasswordReset)
            .await?;
        Ok(())
    }

    /// Replace the password after consuming a reset code
    ///
    /// The new password is checked first so a weak choice does not burn the code.
    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> DomainResult<()> {
        let email = Self::check_email(email)?;
        Self::check_password_policy(new_password)?;

        if !self.otp_manager.verify(&email, code, OtpPurpose::PasswordReset).await? {
            return Err(AuthError::InvalidVerificationCode.into());
        }

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = self.hasher.hash(new_password).await?;
        if !self.user_repository.update_password(user.id, &password_hash).await? {
            return Err(AuthError::UserNotFound.into());
        }

        tracing::info!(user_id = %user.id, event = "password_reset", "Password reset completed");
        Ok(())
    }

    fn check_email(email: &str) -> DomainResult<String> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into());
        }
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmailFormat { email }.into());
        }
        Ok(email)
    }

    fn check_password_policy(password: &str) -> DomainResult<()> {
        let result = validate_password(password);
        if result.is_valid {
            Ok(())
        } else {
            Err(AuthError::WeakPassword {
                violations: result.errors,
            }
            .into())
        }
    }
}
