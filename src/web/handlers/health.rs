//! Health check HTTP handlers

use axum::{
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
};
use tracing::warn;

use crate::database::Database;
use crate::web::{
    AppState,
    extractors::RequestContext,
    responses::{HealthResponse, ok, service_unavailable},
    utils::log_request,
};

/// Health check endpoint
///
/// Always answers 200; the body reports database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health summary", body = HealthResponse),
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    let connected = database_connected(&state.database).await;
    ok(HealthResponse::new(
        connected,
        state.start_time.elapsed().as_secs(),
    ))
}

/// Readiness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve requests"),
        (status = 503, description = "Database unreachable"),
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    if database_connected(&state.database).await {
        ok(serde_json::json!({
            "status": "ready",
            "timestamp": chrono::Utc::now()
        }))
        .into_response()
    } else {
        service_unavailable("Database unreachable").into_response()
    }
}

/// Liveness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive"),
    )
)]
pub async fn liveness_check(method: Method, uri: Uri, context: RequestContext) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    ok(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now()
    }))
}

async fn database_connected(database: &Database) -> bool {
    match database.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    }
}
