//! Blend log HTTP handlers
//!
//! The dispenser firmware talks to these two routes directly, so they answer
//! with bare JSON payloads rather than the API envelope.

use axum::{
    Json,
    extract::{RawQuery, State},
    http::{Method, Uri},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppResult;
use crate::models::BlendEntryId;
use crate::web::{AppState, extractors::RequestContext, utils::log_request};

/// Id assigned to a submitted blend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignResponse {
    pub id: BlendEntryId,
}

/// Every logged blend as `[id, recipe payload]`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlendLogResponse {
    #[schema(value_type = Vec<Vec<Object>>, example = json!([[1, "[[1,10],[2,20]]"]]))]
    pub log: Vec<(BlendEntryId, String)>,
}

/// Log a blend, or find the equivalent one already logged
#[utoipa::path(
    get,
    path = "/ws/blend-log/assign",
    tag = "blend-log",
    params(
        ("slot1" = Option<i64>, Query, description = "Amount poured from slot 1; any `<prefix><slot>` parameter is accepted", example = 10),
    ),
    responses(
        (status = 200, description = "Id of the logged blend", body = AssignResponse),
        (status = 400, description = "Malformed slot or amount"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn assign_blend(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
    RawQuery(query): RawQuery,
) -> AppResult<Json<AssignResponse>> {
    log_request(&method, &uri, &context);

    let query = query.unwrap_or_default();
    let candidate = state
        .blend_service
        .parse_candidate(url::form_urlencoded::parse(query.as_bytes()))?;
    let id = state.blend_service.submit_or_find(&candidate).await?;

    Ok(Json(AssignResponse { id }))
}

/// List every logged blend
#[utoipa::path(
    get,
    path = "/ws/blend-log",
    tag = "blend-log",
    responses(
        (status = 200, description = "All logged blends in insertion order", body = BlendLogResponse),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn list_blend_log(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> AppResult<Json<BlendLogResponse>> {
    log_request(&method, &uri, &context);

    let log = state
        .blend_service
        .log()
        .await?
        .into_iter()
        .map(|entry| (entry.id, entry.recipe))
        .collect();

    Ok(Json(BlendLogResponse { log }))
}
