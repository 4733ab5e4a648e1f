//! OpenAPI documentation generated with utoipa
//!
//! Handlers carry `#[utoipa::path]` annotations; this module only lists them.

use utoipa::OpenApi;

use crate::models::{CreateDrinkNameRequest, DrinkName};
use crate::web::handlers::{
    blend_log::{AssignResponse, BlendLogResponse},
    drink_names, health,
};
use crate::web::responses::{ApiResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blend Log API",
        description = "Logs the ingredient blends poured by a drink mixing machine and \
                       hands out a stable id per distinct blend."
    ),
    paths(
        crate::web::handlers::blend_log::assign_blend,
        crate::web::handlers::blend_log::list_blend_log,
        drink_names::list_drink_names,
        drink_names::get_drink_name,
        drink_names::create_drink_name,
        health::health_check,
        health::readiness_check,
        health::liveness_check,
    ),
    components(
        schemas(
            AssignResponse,
            BlendLogResponse,
            DrinkName,
            CreateDrinkNameRequest,
            HealthResponse,
            ApiResponse<DrinkName>,
            ApiResponse<Vec<DrinkName>>,
        )
    ),
    tags(
        (name = "blend-log", description = "Blend submission and deduplication"),
        (name = "drink-names", description = "Drink name catalogue"),
        (name = "health", description = "Service health monitoring"),
    )
)]
pub struct ApiDoc;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
