use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use helmsman_core::{AppError, PermissionMatrix, UiPermissionMatrix};
use helmsman_models::{
    RolePermissionsResponse, RoleUiPermissionsResponse, UpdateRolePermissionsDto,
    UpdateUiPermissionsDto,
};

use crate::middleware::permission::{
    RequireRoleEdit, RequireRoleView, RequireUiComponentEdit, RequireUiComponentView,
};
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Role → resource → allowed actions", body = PermissionMatrix),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:view")
    ),
    tag = "Permissions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(guard))]
pub async fn get_permission_matrix(
    RequireRoleView(guard): RequireRoleView,
) -> Result<Json<PermissionMatrix>, AppError> {
    // Already loaded by the guard for this request.
    let matrix = guard.permission_matrix().await?;
    Ok(Json(matrix.clone()))
}

#[utoipa::path(
    get,
    path = "/api/roles/{name}/permissions",
    params(("name" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Resource → actions for the role", body = RolePermissionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:view"),
        (status = 404, description = "Role not found")
    ),
    tag = "Permissions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    _guard: RequireRoleView,
    Path(name): Path<String>,
) -> Result<Json<RolePermissionsResponse>, AppError> {
    let permissions = PermissionService::get_role_permissions(&state.db, &name).await?;
    Ok(Json(RolePermissionsResponse {
        role: name,
        permissions,
    }))
}

#[utoipa::path(
    put,
    path = "/api/roles/{name}/permissions",
    params(("name" = String, Path, description = "Role name")),
    request_body = UpdateRolePermissionsDto,
    responses(
        (status = 200, description = "Permissions updated", body = RolePermissionsResponse),
        (status = 400, description = "Unknown action for a resource"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires role:edit"),
        (status = 404, description = "Role or resource not found")
    ),
    tag = "Permissions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_role_permissions(
    State(state): State<AppState>,
    _guard: RequireRoleEdit,
    Path(name): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRolePermissionsDto>,
) -> Result<Json<RolePermissionsResponse>, AppError> {
    let permissions =
        PermissionService::set_role_permissions(&state.db, &name, dto.permissions).await?;
    Ok(Json(RolePermissionsResponse {
        role: name,
        permissions,
    }))
}

#[utoipa::path(
    get,
    path = "/api/ui-components/permissions",
    responses(
        (status = 200, description = "Role → component → enabled", body = UiPermissionMatrix),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:view")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(guard))]
pub async fn get_ui_permission_matrix(
    RequireUiComponentView(guard): RequireUiComponentView,
) -> Result<Json<UiPermissionMatrix>, AppError> {
    let matrix = guard.ui_permission_matrix().await?;
    Ok(Json(matrix.clone()))
}

#[utoipa::path(
    get,
    path = "/api/roles/{name}/ui-permissions",
    params(("name" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Component flags for the role", body = RoleUiPermissionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:view"),
        (status = 404, description = "Role not found")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_role_ui_permissions(
    State(state): State<AppState>,
    _guard: RequireUiComponentView,
    Path(name): Path<String>,
) -> Result<Json<RoleUiPermissionsResponse>, AppError> {
    let components = PermissionService::get_role_ui_permissions(&state.db, &name).await?;
    Ok(Json(RoleUiPermissionsResponse {
        role: name,
        components,
    }))
}

#[utoipa::path(
    put,
    path = "/api/roles/{name}/ui-permissions",
    params(("name" = String, Path, description = "Role name")),
    request_body = UpdateUiPermissionsDto,
    responses(
        (status = 200, description = "Component flags updated", body = RoleUiPermissionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:edit"),
        (status = 404, description = "Role or component not found")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_role_ui_permissions(
    State(state): State<AppState>,
    _guard: RequireUiComponentEdit,
    Path(name): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUiPermissionsDto>,
) -> Result<Json<RoleUiPermissionsResponse>, AppError> {
    let components =
        PermissionService::set_role_ui_permissions(&state.db, &name, dto.components).await?;
    Ok(Json(RoleUiPermissionsResponse {
        role: name,
        components,
    }))
}
