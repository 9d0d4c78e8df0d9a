//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Request id tracing and security headers
//! - Error handling and response formatting

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use server::ApiServer;
