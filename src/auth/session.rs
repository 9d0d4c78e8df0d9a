//! Session cookie handling
//!
//! The session token travels in an HttpOnly cookie. API clients that cannot
//! hold cookies may send the same token as `Authorization: Bearer <token>`.

use crate::auth::password::hash_password;
use crate::core::config::Config;
use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "session";

/// Settings shared by every handler that issues or checks sessions
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub secure_cookies: bool,
    pub bcrypt_cost: u32,
    /// Hash checked for unknown logins so they cost as much as a wrong password
    pub dummy_hash: String,
}

impl AuthSettings {
    pub fn new(
        jwt_secret: impl Into<String>,
        session_ttl: chrono::Duration,
        secure_cookies: bool,
        bcrypt_cost: u32,
    ) -> Self {
        let dummy_hash = hash_password("label-desk-unknown-login", bcrypt_cost).unwrap_or_else(|e| {
            tracing::warn!(error = %e, cost = bcrypt_cost, "Failed to prepare dummy password hash");
            String::new()
        });

        Self {
            jwt_secret: jwt_secret.into(),
            session_ttl,
            secure_cookies,
            bcrypt_cost,
            dummy_hash,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.security.jwt_secret.clone(),
            chrono::Duration::days(config.security.session_ttl_days),
            config.server.environment.is_production(),
            config.security.bcrypt_cost,
        )
    }

    /// `Set-Cookie` value that stores a freshly issued token
    pub fn session_cookie(&self, token: &str) -> HeaderValue {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, token.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::seconds(self.session_ttl.num_seconds()))
            .build();
        to_header_value(&cookie)
    }

    /// `Set-Cookie` value that makes the browser drop the session
    pub fn clear_cookie(&self) -> HeaderValue {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::ZERO)
            .build();
        to_header_value(&cookie)
    }
}

fn to_header_value(cookie: &Cookie<'_>) -> HeaderValue {
    // Token characters are base64url and dots, always valid header bytes
    HeaderValue::from_str(&cookie.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("session=; Path=/; Max-Age=0"))
}

/// Find the session token in the request headers: cookie first, then bearer
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    session_cookie_value(headers).or_else(|| bearer_token(headers))
}

fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
