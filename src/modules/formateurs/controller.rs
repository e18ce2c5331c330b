use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    Cours, CreateFormateurDto, Formateur, FormateurFilterParams, PaginatedFormateursResponse,
    UpdateFormateurDto,
};

use crate::middleware::permission::{
    RequireFormateurCreate, RequireFormateurDelete, RequireFormateurEdit, RequireFormateurView,
};
use crate::modules::formateurs::service::FormateurService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/formateurs",
    request_body = CreateFormateurDto,
    responses(
        (status = 201, description = "Formateur created", body = Formateur),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:create"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard, dto))]
pub async fn create_formateur(
    State(state): State<AppState>,
    _guard: RequireFormateurCreate,
    ValidatedJson(dto): ValidatedJson<CreateFormateurDto>,
) -> Result<(StatusCode, Json<Formateur>), AppError> {
    let formateur = FormateurService::create_formateur(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(formateur)))
}

#[utoipa::path(
    get,
    path = "/api/formateurs",
    params(FormateurFilterParams),
    responses(
        (status = 200, description = "Paginated formateurs", body = PaginatedFormateursResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:view")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_formateurs(
    State(state): State<AppState>,
    _guard: RequireFormateurView,
    Query(filters): Query<FormateurFilterParams>,
) -> Result<Json<PaginatedFormateursResponse>, AppError> {
    Ok(Json(
        FormateurService::get_formateurs(&state.db, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/formateurs/{id}",
    params(("id" = Uuid, Path, description = "Formateur ID")),
    responses(
        (status = 200, description = "Formateur details", body = Formateur),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:view"),
        (status = 404, description = "Formateur not found")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_formateur(
    State(state): State<AppState>,
    _guard: RequireFormateurView,
    Path(id): Path<Uuid>,
) -> Result<Json<Formateur>, AppError> {
    Ok(Json(FormateurService::get_formateur(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/formateurs/{id}",
    params(("id" = Uuid, Path, description = "Formateur ID")),
    request_body = UpdateFormateurDto,
    responses(
        (status = 200, description = "Formateur updated", body = Formateur),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:edit"),
        (status = 404, description = "Formateur not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard, dto))]
pub async fn update_formateur(
    State(state): State<AppState>,
    _guard: RequireFormateurEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFormateurDto>,
) -> Result<Json<Formateur>, AppError> {
    Ok(Json(
        FormateurService::update_formateur(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/formateurs/{id}",
    params(("id" = Uuid, Path, description = "Formateur ID")),
    responses(
        (status = 204, description = "Formateur deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:delete"),
        (status = 404, description = "Formateur not found")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_formateur(
    State(state): State<AppState>,
    _guard: RequireFormateurDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FormateurService::delete_formateur(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cours taught by the formateur
#[utoipa::path(
    get,
    path = "/api/formateurs/{id}/cours",
    params(("id" = Uuid, Path, description = "Formateur ID")),
    responses(
        (status = 200, description = "Assigned cours", body = Vec<Cours>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires formateur:view"),
        (status = 404, description = "Formateur not found")
    ),
    tag = "Formateurs",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_formateur_cours(
    State(state): State<AppState>,
    _guard: RequireFormateurView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Cours>>, AppError> {
    Ok(Json(
        FormateurService::get_formateur_cours(&state.db, id).await?,
    ))
}
