//! JWT session token generation and validation

use crate::core::error::{DeskError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| DeskError::Unauthorized("Malformed token subject".to_string()))
    }
}

/// Generate a signed token for a user, valid for `ttl`
pub fn generate_token(user_id: i64, secret: &str, ttl: chrono::Duration) -> Result<String> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| DeskError::TokenError("Failed to calculate expiration".to_string()))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DeskError::TokenError(format!("Failed to generate token: {}", e)))
}

/// Validate a token's signature and expiry and extract its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| DeskError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = generate_token(42, SECRET, chrono::Duration::days(7)).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(1, SECRET, chrono::Duration::days(7)).unwrap();
        let err = validate_token(&token, "another-secret").unwrap_err();
        assert!(matches!(err, DeskError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60s leeway
        let token = generate_token(1, SECRET, chrono::Duration::minutes(-5)).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = generate_token(1, SECRET, chrono::Duration::days(1)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(validate_token(&tampered, SECRET).is_err());
        assert!(validate_token("not.a.token", SECRET).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "admin".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.user_id(), Err(DeskError::Unauthorized(_))));
    }
}
