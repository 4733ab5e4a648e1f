//! Web layer module
//!
//! HTTP interface for the blend log service. Handlers stay thin and delegate
//! to the service layer or repositories.
//!
//! - **Handlers**: request handlers organized by domain
//! - **Responses**: standardized envelope and error mapping
//! - **Extractors**: request context and query parameter extraction
//! - **Middleware**: request ids and request logging

use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    config::Config,
    database::{
        Database,
        repositories::{BlendLogSeaOrmRepository, DrinkNameSeaOrmRepository},
    },
    services::BlendDedupService,
};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod utils;

pub use extractors::RequestContext;
pub use responses::{ApiResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub blend_service: BlendDedupService,
    pub drink_names: DrinkNameSeaOrmRepository,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, database: Database) -> Self {
        let blend_store = Arc::new(BlendLogSeaOrmRepository::new(database.connection()));
        let blend_service = BlendDedupService::new(blend_store, config.blends.slot_prefix.clone());
        let drink_names = DrinkNameSeaOrmRepository::new(database.connection());

        Self {
            database,
            config,
            blend_service,
            drink_names,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/live", get(handlers::health::liveness_check))
        // Dispenser endpoints
        .route("/ws/blend-log", get(handlers::blend_log::list_blend_log))
        .route(
            "/ws/blend-log/assign",
            get(handlers::blend_log::assign_blend),
        )
        // OpenAPI documentation
        .merge(openapi_routes())
        .nest("/api/v1", api_v1_routes())
        // Outermost first
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(
                    middleware::request_logging_middleware,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Swagger UI at `/docs`, document at `/api/openapi.json`
fn openapi_routes() -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", openapi::openapi_spec()))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/drink-names",
            get(handlers::drink_names::list_drink_names)
                .post(handlers::drink_names::create_drink_name),
        )
        .route(
            "/drink-names/{id}",
            get(handlers::drink_names::get_drink_name),
        )
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, database: Database) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = create_app(AppState::new(config, database));

        Ok(Self { app, addr })
    }

    /// Serve until SIGINT or SIGTERM, then drain in-flight requests
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;

        info!("Web server listening on {}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Web server stopped");
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down gracefully"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
