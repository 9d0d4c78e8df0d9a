//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Session login/logout with an HttpOnly cookie
//! - JWT token generation and validation
//! - Password hashing and verification
//! - Authentication and admin guards
//! - Default admin provisioning

pub mod bootstrap;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use bootstrap::ensure_default_admin;
pub use handlers::{login, logout, me};
pub use jwt::{generate_token, validate_token, Claims};
pub use middleware::{authenticate, require_admin, AuthUser};
pub use password::{hash_password, verify_password};
pub use session::{extract_token, AuthSettings};
