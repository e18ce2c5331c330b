use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    CreateUiComponentDto, UiComponent, UiComponentFilterParams, UpdateUiComponentDto,
};

use crate::middleware::permission::{
    RequireUiComponentCreate, RequireUiComponentDelete, RequireUiComponentEdit,
    RequireUiComponentView,
};
use crate::modules::ui_components::service::UiComponentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/ui-components",
    params(UiComponentFilterParams),
    responses(
        (status = 200, description = "UI components", body = Vec<UiComponent>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:view")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_components(
    State(state): State<AppState>,
    _guard: RequireUiComponentView,
    Query(filters): Query<UiComponentFilterParams>,
) -> Result<Json<Vec<UiComponent>>, AppError> {
    Ok(Json(
        UiComponentService::get_components(&state.db, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/ui-components/{id}",
    params(("id" = Uuid, Path, description = "UI component ID")),
    responses(
        (status = 200, description = "UI component", body = UiComponent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:view"),
        (status = 404, description = "UI component not found")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_component(
    State(state): State<AppState>,
    _guard: RequireUiComponentView,
    Path(id): Path<Uuid>,
) -> Result<Json<UiComponent>, AppError> {
    Ok(Json(UiComponentService::get_component(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/ui-components",
    request_body = CreateUiComponentDto,
    responses(
        (status = 201, description = "UI component created", body = UiComponent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:create"),
        (status = 409, description = "Component name already exists")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_component(
    State(state): State<AppState>,
    _guard: RequireUiComponentCreate,
    ValidatedJson(dto): ValidatedJson<CreateUiComponentDto>,
) -> Result<(StatusCode, Json<UiComponent>), AppError> {
    let component = UiComponentService::create_component(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(component)))
}

#[utoipa::path(
    put,
    path = "/api/ui-components/{id}",
    params(("id" = Uuid, Path, description = "UI component ID")),
    request_body = UpdateUiComponentDto,
    responses(
        (status = 200, description = "UI component updated", body = UiComponent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:edit"),
        (status = 404, description = "UI component not found")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_component(
    State(state): State<AppState>,
    _guard: RequireUiComponentEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUiComponentDto>,
) -> Result<Json<UiComponent>, AppError> {
    Ok(Json(
        UiComponentService::update_component(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/ui-components/{id}",
    params(("id" = Uuid, Path, description = "UI component ID")),
    responses(
        (status = 204, description = "UI component deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ui_component:delete"),
        (status = 404, description = "UI component not found")
    ),
    tag = "UI Components",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_component(
    State(state): State<AppState>,
    _guard: RequireUiComponentDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UiComponentService::delete_component(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
