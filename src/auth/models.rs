//! Authentication request/response models

use crate::core::error::{DeskError, Result};
use crate::db::models::{Role, User};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        if self.login.trim().is_empty() || self.password.is_empty() {
            return Err(DeskError::InvalidInput(
                "login and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// User as exposed to clients; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub login: String,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// `{ "user": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserInfo,
}

/// Generic success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
