//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::jwt::generate_token;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{LoginRequest, SuccessResponse, UserEnvelope, UserInfo};
use crate::auth::password::verify_password;
use crate::core::error::{DeskError, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;

    let login = req.login.trim();
    tracing::info!(login = %login, "Login attempt");

    let user = match state.user_repo.find_by_login(login).await? {
        Some(user) => user,
        None => {
            // Same bcrypt work as a wrong password
            verify_password(&req.password, &state.auth.dummy_hash);
            tracing::warn!(login = %login, "Unknown login");
            return Err(DeskError::InvalidCredentials);
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(login = %login, "Invalid password");
        return Err(DeskError::InvalidCredentials);
    }

    let token = generate_token(user.id, &state.auth.jwt_secret, state.auth.session_ttl)?;
    let cookie = state.auth.session_cookie(&token);

    tracing::info!(user_id = user.id, login = %user.login, "Login successful");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UserEnvelope {
            user: UserInfo::from(user),
        }),
    ))
}

/// Handler for POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.auth.clear_cookie())],
        Json(SuccessResponse::ok()),
    )
}

/// Handler for GET /api/auth/me
pub async fn me(user: AuthUser) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        user: UserInfo::from(user),
    })
}
