//! MySQL implementation of the UserRepository trait.
//!
//! Uniqueness of email and username is enforced by unique keys; a duplicate
//! key error from the insert is mapped to the matching auth error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vh_core::domain::entities::user::User;
use vh_core::errors::{AuthError, DomainError};
use vh_core::repositories::UserRepository;

use super::db_error;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id CHAR(36) NOT NULL,
        email VARCHAR(320) NOT NULL,
        username VARCHAR(64) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        PRIMARY KEY (id),
        UNIQUE KEY uq_users_email (email),
        UNIQUE KEY uq_users_username (username)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
"#;

/// Which unique key a duplicate-entry error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DuplicateKey {
    Email,
    Username,
}

/// Classify a MySQL duplicate-entry message, e.g.
/// `Duplicate entry 'a@b.c' for key 'users.uq_users_email'`
pub(crate) fn classify_duplicate(message: &str) -> Option<DuplicateKey> {
    if !message.contains("Duplicate entry") {
        return None;
    }
    if message.contains("uq_users_username") {
        Some(DuplicateKey::Username)
    } else if message.contains("uq_users_email") {
        Some(DuplicateKey::Email)
    } else {
        None
    }
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the users table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("create users", e))?;
        tracing::info!("users table ready");
        Ok(())
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("decode user id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Persistence {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row
                .try_get("email")
                .map_err(|e| db_error("decode user email", e))?,
            username: row
                .try_get("username")
                .map_err(|e| db_error("decode user username", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| db_error("decode user password_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("decode user created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_error("decode user updated_at", e))?,
        })
    }

    async fn find_one(&self, column: &'static str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT id, email, username, password_hash, created_at, updated_at \
             FROM users WHERE {} = ? LIMIT 1",
            column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (id, email, username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation() =>
            {
                match classify_duplicate(db_err.message()) {
                    Some(DuplicateKey::Username) => Err(AuthError::UsernameTaken.into()),
                    _ => Err(AuthError::UserAlreadyExists.into()),
                }
            }
            Err(e) => Err(db_error("create user", e)),
        }
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update password", e))?;

        Ok(result.rows_affected() == 1)
    }
}
