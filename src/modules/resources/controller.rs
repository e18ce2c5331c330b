use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_models::{CreateResourceDto, Resource, UpdateResourceDto};

use crate::middleware::permission::{
    RequireResourceCreate, RequireResourceDelete, RequireResourceEdit, RequireResourceView,
};
use crate::modules::resources::service::ResourceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/resources",
    responses(
        (status = 200, description = "All resources", body = Vec<Resource>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires resource:view")
    ),
    tag = "Resources",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_resources(
    State(state): State<AppState>,
    _guard: RequireResourceView,
) -> Result<Json<Vec<Resource>>, AppError> {
    Ok(Json(ResourceService::get_resources(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/resources/{name}",
    params(("name" = String, Path, description = "Resource name")),
    responses(
        (status = 200, description = "Resource", body = Resource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires resource:view"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_resource(
    State(state): State<AppState>,
    _guard: RequireResourceView,
    Path(name): Path<String>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(ResourceService::get_resource(&state.db, &name).await?))
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires resource:create"),
        (status = 409, description = "Resource name already exists")
    ),
    tag = "Resources",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_resource(
    State(state): State<AppState>,
    _guard: RequireResourceCreate,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let resource = ResourceService::create_resource(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Update a resource; actions removed from the vocabulary are revoked from every role
#[utoipa::path(
    put,
    path = "/api/resources/{name}",
    params(("name" = String, Path, description = "Resource name")),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires resource:edit"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_resource(
    State(state): State<AppState>,
    _guard: RequireResourceEdit,
    Path(name): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(
        ResourceService::update_resource(&state.db, &name, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/resources/{name}",
    params(("name" = String, Path, description = "Resource name")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires resource:delete"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_resource(
    State(state): State<AppState>,
    _guard: RequireResourceDelete,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    ResourceService::delete_resource(&state.db, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
