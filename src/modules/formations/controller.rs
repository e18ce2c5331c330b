use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    CreateFormationDto, Formation, FormationFilterParams, PaginatedFormationsResponse,
    UpdateFormationDto,
};

use crate::middleware::permission::{
    RequireFormationCreate, RequireFormationDelete, RequireFormationEdit, RequireFormationView,
};
use crate::modules::formations::service::FormationService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/formations",
    request_body = CreateFormationDto,
    responses(
        (status = 201, description = "Formation created", body = Formation),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formation:create"),
        (status = 409, description = "Code already in use")
    ),
    tag = "Formations",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_formation(
    State(state): State<AppState>,
    _guard: RequireFormationCreate,
    ValidatedJson(dto): ValidatedJson<CreateFormationDto>,
) -> Result<(StatusCode, Json<Formation>), AppError> {
    let formation = FormationService::create_formation(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(formation)))
}

#[utoipa::path(
    get,
    path = "/api/formations",
    params(FormationFilterParams),
    responses(
        (status = 200, description = "Paginated formations", body = PaginatedFormationsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formation:view")
    ),
    tag = "Formations",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_formations(
    State(state): State<AppState>,
    _guard: RequireFormationView,
    Query(filters): Query<FormationFilterParams>,
) -> Result<Json<PaginatedFormationsResponse>, AppError> {
    Ok(Json(
        FormationService::get_formations(&state.db, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/formations/{id}",
    params(("id" = Uuid, Path, description = "Formation ID")),
    responses(
        (status = 200, description = "Formation details", body = Formation),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formation:view"),
        (status = 404, description = "Formation not found")
    ),
    tag = "Formations",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_formation(
    State(state): State<AppState>,
    _guard: RequireFormationView,
    Path(id): Path<Uuid>,
) -> Result<Json<Formation>, AppError> {
    Ok(Json(FormationService::get_formation(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/formations/{id}",
    params(("id" = Uuid, Path, description = "Formation ID")),
    request_body = UpdateFormationDto,
    responses(
        (status = 200, description = "Formation updated", body = Formation),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formation:edit"),
        (status = 404, description = "Formation not found"),
        (status = 409, description = "Code already in use")
    ),
    tag = "Formations",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_formation(
    State(state): State<AppState>,
    _guard: RequireFormationEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFormationDto>,
) -> Result<Json<Formation>, AppError> {
    Ok(Json(
        FormationService::update_formation(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/formations/{id}",
    params(("id" = Uuid, Path, description = "Formation ID")),
    responses(
        (status = 204, description = "Formation deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formation:delete"),
        (status = 404, description = "Formation not found")
    ),
    tag = "Formations",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_formation(
    State(state): State<AppState>,
    _guard: RequireFormationDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FormationService::delete_formation(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
