use super::AppState;
use crate::api::models::{CreateUserRequest, UsersResponse};
use crate::auth::middleware::AuthUser;
use crate::auth::models::{SuccessResponse, UserEnvelope, UserInfo};
use crate::auth::password::hash_password;
use crate::core::error::{DeskError, Result};
use crate::db::models::NewUser;
use crate::db::repository::Repository;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Handler for GET /api/users - List all users (admin only)
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let users = state
        .user_repo
        .find_all()
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(Json(UsersResponse { users }))
}

/// Handler for POST /api/users - Create new user (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    admin: AuthUser,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    let login = req.validate()?;

    let new_user = NewUser {
        login,
        password_hash: hash_password(&req.password, state.auth.bcrypt_cost)?,
        role: req.role.unwrap_or_default(),
    };

    let user = state.user_repo.create(&new_user).await?;

    tracing::info!(
        user_id = user.id,
        login = %user.login,
        role = %user.role,
        created_by = admin.id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: UserInfo::from(user),
        }),
    ))
}

/// Handler for DELETE /api/users/:id - Delete user (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    admin: AuthUser,
) -> Result<Json<SuccessResponse>> {
    let user_id: i64 = user_id
        .parse()
        .map_err(|_| DeskError::InvalidInput(format!("invalid user id '{}'", user_id)))?;

    if admin.id == user_id {
        return Err(DeskError::CannotDeleteSelf);
    }

    if !state.user_repo.delete(user_id).await? {
        return Err(DeskError::NotFound(format!("User {} not found", user_id)));
    }

    tracing::info!(user_id, deleted_by = admin.id, "User deleted");

    Ok(Json(SuccessResponse::ok()))
}
