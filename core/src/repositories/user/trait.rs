//! User repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Emails are stored normalized; callers pass the normalized form to lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalized email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No account for this email
    /// * `Err(DomainError)` - Store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// Fails with `AuthError::UserAlreadyExists` or `AuthError::UsernameTaken`
    /// when a uniqueness constraint is hit.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace the stored password hash. Returns false when no such user exists.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError>;
}
