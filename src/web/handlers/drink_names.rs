//! Drink name HTTP handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, Uri},
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::models::CreateDrinkNameRequest;
use crate::web::{
    AppState,
    extractors::{DrinkNameFilterParams, RequestContext},
    responses::{created, handle_error, ok},
    utils::{log_request, parse_id_param},
};

/// List drink names in sortname order
#[utoipa::path(
    get,
    path = "/api/v1/drink-names",
    tag = "drink-names",
    params(DrinkNameFilterParams),
    responses(
        (status = 200, description = "Drink names retrieved successfully"),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_drink_names(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
    filter: DrinkNameFilterParams,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    match state.drink_names.list_all(filter.common_only()).await {
        Ok(names) => ok(names).into_response(),
        Err(e) => handle_error(e.into()).into_response(),
    }
}

/// Get a drink name by id
#[utoipa::path(
    get,
    path = "/api/v1/drink-names/{id}",
    tag = "drink-names",
    params(
        ("id" = i32, Path, description = "Drink name id", example = 1),
    ),
    responses(
        (status = 200, description = "Drink name retrieved successfully"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Drink name not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_drink_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    let id = match parse_id_param(&id) {
        Ok(id) => id,
        Err(e) => return handle_error(e).into_response(),
    };

    match state.drink_names.find_by_id(id).await {
        Ok(Some(name)) => ok(name).into_response(),
        Ok(None) => handle_error(AppError::not_found("DrinkName", id)).into_response(),
        Err(e) => handle_error(e.into()).into_response(),
    }
}

/// Create a drink name
#[utoipa::path(
    post,
    path = "/api/v1/drink-names",
    tag = "drink-names",
    request_body = CreateDrinkNameRequest,
    responses(
        (status = 201, description = "Drink name created successfully"),
        (status = 400, description = "Invalid request data"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_drink_name(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    context: RequestContext,
    body: Result<Json<CreateDrinkNameRequest>, JsonRejection>,
) -> impl IntoResponse {
    log_request(&method, &uri, &context);

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return handle_error(AppError::validation(rejection.body_text())).into_response();
        }
    };

    if let Err(e) = request.validate() {
        return handle_error(e).into_response();
    }

    match state.drink_names.create(request).await {
        Ok(name) => {
            tracing::info!(id = name.id, "Created {}", name);
            created(name).into_response()
        }
        Err(e) => handle_error(e.into()).into_response(),
    }
}
