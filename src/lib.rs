//! Label Desk Backend Library
//!
//! Authentication and user management over SQLite, EAN-13 helpers and the
//! label document model used by the browser label designer.

pub mod api;
pub mod auth;
pub mod barcode;
pub mod core;
pub mod db;
pub mod label;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{Config, DeskError};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;
