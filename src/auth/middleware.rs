//! Authentication middleware

use crate::api::handlers::AppState;
use crate::api::middleware::SpanUserId;
use crate::auth::jwt::validate_token;
use crate::auth::models::UserInfo;
use crate::auth::session::extract_token;
use crate::core::error::{DeskError, Result};
use crate::db::models::Role;
use crate::db::repository::Repository;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Authenticated caller, stored in request extensions by [`authenticate`]
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub login: String,
    pub role: Role,
    pub created_at: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<AuthUser> for UserInfo {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            login: user.login,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

async fn resolve_user(state: &AppState, token: Option<String>) -> Result<AuthUser> {
    let token = token.ok_or_else(|| DeskError::Unauthorized("Missing session token".to_string()))?;

    let claims = validate_token(&token, &state.auth.jwt_secret)?;
    let user_id = claims.user_id()?;

    let user = state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DeskError::Unauthorized(format!("User {} no longer exists", user_id)))?;

    Ok(AuthUser {
        id: user.id,
        login: user.login,
        role: user.role,
        created_at: user.created_at,
    })
}

/// Authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(request.headers());

    match resolve_user(&state, token).await {
        Ok(user) => {
            let user_id = user.id;
            request.extensions_mut().insert(user);
            let mut response = next.run(request).await;
            response.extensions_mut().insert(SpanUserId(user_id));
            response
        }
        Err(e) => e.into_response(),
    }
}

/// Admin guard; must run after [`authenticate`]
pub async fn require_admin(request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(user) => {
            DeskError::Forbidden(format!("User {} is not an admin", user.id)).into_response()
        }
        None => DeskError::Unauthorized("User not authenticated".to_string()).into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = DeskError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| DeskError::Unauthorized("User not authenticated".to_string()))
    }
}
