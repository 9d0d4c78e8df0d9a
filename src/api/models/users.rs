use crate::auth::models::UserInfo;
use crate::core::error::{DeskError, Result};
use crate::db::models::Role;
use serde::{Deserialize, Serialize};

/// Longest accepted login
pub const MAX_LOGIN_LEN: usize = 64;

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to `user`
    #[serde(default)]
    pub role: Option<Role>,
}

impl CreateUserRequest {
    /// Validate and return the trimmed login
    pub fn validate(&self) -> Result<String> {
        let login = self.login.trim();
        if login.is_empty() {
            return Err(DeskError::InvalidInput("login is required".to_string()));
        }
        if login.chars().count() > MAX_LOGIN_LEN {
            return Err(DeskError::InvalidInput(format!(
                "login must be at most {} characters",
                MAX_LOGIN_LEN
            )));
        }
        if self.password.is_empty() {
            return Err(DeskError::InvalidInput("password is required".to_string()));
        }
        Ok(login.to_string())
    }
}

/// `{ "users": [...] }`
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserInfo>,
}
