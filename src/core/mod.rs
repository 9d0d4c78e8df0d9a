//! Core application module
//!
//! This module provides the cross-cutting pieces every other module uses:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{DeskError, ErrorResponse, Result};
pub use logging::Logger;
