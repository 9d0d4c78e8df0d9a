//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request timeouts
//! - CORS support
//! - Static hosting of the single-page frontend

use crate::api::handlers::AppState;
use crate::api::middleware::{
    request_id_middleware, security_headers_middleware, SecurityHeadersConfig,
};
use crate::api::routes::build_api_routes;
use crate::auth::session::AuthSettings;
use crate::core::config::ServerConfig;
use crate::core::{Config, DeskError};
use crate::db::manager::DatabaseManager;
use crate::db::repository::UserRepository;
use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::HeaderValue,
    middleware,
    response::{IntoResponse, Response},
    BoxError, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::{timeout::error::Elapsed, ServiceBuilder, ServiceExt};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let server_config = config.server.clone();
        let router = Self::build_router(&config, db);

        Ok(Self {
            router,
            config: server_config,
        })
    }

    /// Build the Axum router with all routes and middleware
    pub fn build_router(config: &Config, db: Arc<DatabaseManager>) -> Router {
        let state = AppState {
            user_repo: Arc::new(UserRepository::new(db)),
            auth: Arc::new(AuthSettings::from_config(config)),
        };

        let router = build_api_routes(state);

        // Everything outside /api/ goes to the SPA, unknown paths get index.html
        let router = match &config.server.static_dir {
            Some(static_dir) => {
                let serve_dir = ServeDir::new(static_dir)
                    .fallback(ServeFile::new(static_dir.join("index.html")));
                router.fallback(move |request: Request| spa_fallback(serve_dir, request))
            }
            None => router.fallback(api_not_found),
        };

        router.layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(Self::build_cors_layer(&config.security.allowed_origins))
                .layer(middleware::from_fn_with_state(
                    SecurityHeadersConfig::from_config(config),
                    security_headers_middleware,
                ))
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(config.server.request_timeout)),
        )
    }

    /// Build CORS layer from allowed origins configuration
    ///
    /// A wildcard cannot be combined with credentials, so `*` allows any
    /// origin without cookies while an explicit list allows credentials.
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        if allowed_origins.iter().any(|o| o == "*") {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            environment = ?self.config.environment,
            request_timeout = self.config.request_timeout,
            static_dir = ?self.config.static_dir,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

async fn api_not_found(request: Request) -> DeskError {
    DeskError::NotFound(format!("No route for {}", request.uri().path()))
}

async fn spa_fallback(serve_dir: ServeDir<ServeFile>, request: Request) -> Response {
    if is_api_path(request.uri().path()) {
        return api_not_found(request).await.into_response();
    }

    match serve_dir.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

async fn handle_middleware_error(err: BoxError) -> DeskError {
    if err.is::<Elapsed>() {
        DeskError::Timeout
    } else {
        DeskError::Internal(err.to_string())
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
