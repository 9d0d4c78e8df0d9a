//! Default admin provisioning

use crate::auth::password::hash_password;
use crate::core::error::{DeskError, Result};
use crate::db::models::{NewUser, Role};
use crate::db::repository::{Repository, UserRepository};
use tracing::info;

pub const DEFAULT_ADMIN_LOGIN: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

/// Create the `admin` account if no user with that login exists.
///
/// Returns whether an account was created. Safe to call on every startup;
/// a concurrent insert that wins the race is treated as success.
pub async fn ensure_default_admin(user_repo: &UserRepository, bcrypt_cost: u32) -> Result<bool> {
    if user_repo.find_by_login(DEFAULT_ADMIN_LOGIN).await?.is_some() {
        return Ok(false);
    }

    info!("No admin account found, creating default admin user...");
    let new_user = NewUser {
        login: DEFAULT_ADMIN_LOGIN.to_string(),
        password_hash: hash_password(DEFAULT_ADMIN_PASSWORD, bcrypt_cost)?,
        role: Role::Admin,
    };

    match user_repo.create(&new_user).await {
        Ok(user) => {
            tracing::warn!(
                user_id = user.id,
                login = DEFAULT_ADMIN_LOGIN,
                "Default admin user created with the well-known password, change it after first login"
            );
            Ok(true)
        }
        Err(DeskError::LoginAlreadyExists(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
