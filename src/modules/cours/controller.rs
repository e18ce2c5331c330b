use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    AssignFormateurDto, Cours, CoursFilterParams, CoursFormateur, CreateCoursDto,
    PaginatedCoursResponse, UpdateCoursDto,
};

use crate::middleware::permission::{
    RequireCoursCreate, RequireCoursDelete, RequireCoursEdit, RequireCoursView,
};
use crate::modules::cours::service::CoursService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/cours",
    request_body = CreateCoursDto,
    responses(
        (status = 201, description = "Cours created", body = Cours),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:create"),
        (status = 404, description = "Formation not found"),
        (status = 409, description = "Code already in use")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_cours(
    State(state): State<AppState>,
    _guard: RequireCoursCreate,
    ValidatedJson(dto): ValidatedJson<CreateCoursDto>,
) -> Result<(StatusCode, Json<Cours>), AppError> {
    let cours = CoursService::create_cours(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(cours)))
}

#[utoipa::path(
    get,
    path = "/api/cours",
    params(CoursFilterParams),
    responses(
        (status = 200, description = "Paginated cours", body = PaginatedCoursResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:view")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_cours_list(
    State(state): State<AppState>,
    _guard: RequireCoursView,
    Query(filters): Query<CoursFilterParams>,
) -> Result<Json<PaginatedCoursResponse>, AppError> {
    Ok(Json(CoursService::get_cours_list(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/cours/{id}",
    params(("id" = Uuid, Path, description = "Cours ID")),
    responses(
        (status = 200, description = "Cours details", body = Cours),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:view"),
        (status = 404, description = "Cours not found")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_cours(
    State(state): State<AppState>,
    _guard: RequireCoursView,
    Path(id): Path<Uuid>,
) -> Result<Json<Cours>, AppError> {
    Ok(Json(CoursService::get_cours(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/cours/{id}",
    params(("id" = Uuid, Path, description = "Cours ID")),
    request_body = UpdateCoursDto,
    responses(
        (status = 200, description = "Cours updated", body = Cours),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:edit"),
        (status = 404, description = "Cours or formation not found"),
        (status = 409, description = "Code already in use")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_cours(
    State(state): State<AppState>,
    _guard: RequireCoursEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCoursDto>,
) -> Result<Json<Cours>, AppError> {
    Ok(Json(CoursService::update_cours(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cours/{id}",
    params(("id" = Uuid, Path, description = "Cours ID")),
    responses(
        (status = 204, description = "Cours deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:delete"),
        (status = 404, description = "Cours not found")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_cours(
    State(state): State<AppState>,
    _guard: RequireCoursDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CoursService::delete_cours(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/cours/{id}/formateurs",
    params(("id" = Uuid, Path, description = "Cours ID")),
    responses(
        (status = 200, description = "Formateurs teaching the cours", body = Vec<CoursFormateur>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:view"),
        (status = 404, description = "Cours not found")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_cours_formateurs(
    State(state): State<AppState>,
    _guard: RequireCoursView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CoursFormateur>>, AppError> {
    Ok(Json(CoursService::get_cours_formateurs(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/cours/{id}/formateurs",
    params(("id" = Uuid, Path, description = "Cours ID")),
    request_body = AssignFormateurDto,
    responses(
        (status = 201, description = "Formateur assigned", body = CoursFormateur),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:edit"),
        (status = 404, description = "Cours or formateur not found"),
        (status = 409, description = "Already assigned")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn assign_formateur(
    State(state): State<AppState>,
    _guard: RequireCoursEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AssignFormateurDto>,
) -> Result<(StatusCode, Json<CoursFormateur>), AppError> {
    let assignment = CoursService::assign_formateur(&state.db, id, dto.formateur_id).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    delete,
    path = "/api/cours/{id}/formateurs/{formateur_id}",
    params(
        ("id" = Uuid, Path, description = "Cours ID"),
        ("formateur_id" = Uuid, Path, description = "Formateur ID")
    ),
    responses(
        (status = 204, description = "Formateur unassigned"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires cours:edit"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Cours",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn unassign_formateur(
    State(state): State<AppState>,
    _guard: RequireCoursEdit,
    Path((id, formateur_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    CoursService::unassign_formateur(&state.db, id, formateur_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
