//! Password hashing and verification using bcrypt

use crate::core::error::Result;

/// Work factor used for stored password hashes
pub const BCRYPT_COST: u32 = 12;

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Hash a password using bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Verify a password against a hash
///
/// A malformed stored hash counts as a mismatch rather than a server error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}
