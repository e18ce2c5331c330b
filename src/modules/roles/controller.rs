use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_models::{CreateRoleDto, Role, RoleDeletedResponse, RoleWithUserCount, UpdateRoleDto};

use crate::middleware::permission::{
    RequireRoleCreate, RequireRoleDelete, RequireRoleEdit, RequireRoleView,
};
use crate::modules::roles::service;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "All roles with their user counts", body = Vec<RoleWithUserCount>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:view")
    ),
    tag = "Roles",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_roles(
    State(state): State<AppState>,
    _guard: RequireRoleView,
) -> Result<Json<Vec<RoleWithUserCount>>, AppError> {
    Ok(Json(service::get_roles(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{name}",
    params(("name" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:view"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_role(
    State(state): State<AppState>,
    _guard: RequireRoleView,
    Path(name): Path<String>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(service::get_role(&state.db, &name).await?))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:create"),
        (status = 409, description = "Role name already exists")
    ),
    tag = "Roles",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_role(
    State(state): State<AppState>,
    _guard: RequireRoleCreate,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    let role = service::create_role(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    put,
    path = "/api/roles/{name}",
    params(("name" = String, Path, description = "Role name")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:edit"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_role(
    State(state): State<AppState>,
    _guard: RequireRoleEdit,
    Path(name): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(service::update_role(&state.db, &name, dto).await?))
}

/// Delete a role; its users fall back to the default role
#[utoipa::path(
    delete,
    path = "/api/roles/{name}",
    params(("name" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Role deleted", body = RoleDeletedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:delete, or system role"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_role(
    State(state): State<AppState>,
    _guard: RequireRoleDelete,
    Path(name): Path<String>,
) -> Result<Json<RoleDeletedResponse>, AppError> {
    Ok(Json(service::delete_role(&state.db, &name).await?))
}
