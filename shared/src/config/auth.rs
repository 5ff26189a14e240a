//! Account and password hashing configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Where user accounts are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStoreBackend {
    #[default]
    Memory,
    Mysql,
}

impl std::str::FromStr for UserStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(UserStoreBackend::Memory),
            "mysql" => Ok(UserStoreBackend::Mysql),
            _ => Err(format!("Invalid user store: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,

    #[serde(default)]
    pub user_store: UserStoreBackend,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 12,
            user_store: UserStoreBackend::default(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
            user_store: env_or("USER_STORE", defaults.user_store),
        }
    }
}
