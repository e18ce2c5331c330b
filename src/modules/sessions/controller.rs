use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    CreateSessionDto, PaginatedSessionsResponse, SessionFilterParams, SessionSummary,
    UpdateSessionDto,
};

use crate::middleware::permission::{
    RequireSessionCreate, RequireSessionDelete, RequireSessionEdit, RequireSessionView,
};
use crate::modules::sessions::service::{SessionService, today};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List sessions; `from`/`to` select sessions overlapping the window
#[utoipa::path(
    get,
    path = "/api/sessions",
    params(SessionFilterParams),
    responses(
        (status = 200, description = "Paginated sessions", body = PaginatedSessionsResponse),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:view")
    ),
    tag = "Sessions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_sessions(
    State(state): State<AppState>,
    _guard: RequireSessionView,
    Query(filters): Query<SessionFilterParams>,
) -> Result<Json<PaginatedSessionsResponse>, AppError> {
    Ok(Json(
        SessionService::get_sessions(&state.db, filters, today()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session with status and enrollment count", body = SessionSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:view"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_session(
    State(state): State<AppState>,
    _guard: RequireSessionView,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(SessionService::get_session(&state.db, id, today()).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionDto,
    responses(
        (status = 201, description = "Session scheduled", body = SessionSummary),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:create"),
        (status = 404, description = "Formation not found")
    ),
    tag = "Sessions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn create_session(
    State(state): State<AppState>,
    _guard: RequireSessionCreate,
    ValidatedJson(dto): ValidatedJson<CreateSessionDto>,
) -> Result<(StatusCode, Json<SessionSummary>), AppError> {
    let session = SessionService::create_session(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateSessionDto,
    responses(
        (status = 200, description = "Session updated", body = SessionSummary),
        (status = 400, description = "Invalid input or date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:edit"),
        (status = 404, description = "Session or formation not found"),
        (status = 409, description = "Capacity below current enrollment")
    ),
    tag = "Sessions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_session(
    State(state): State<AppState>,
    _guard: RequireSessionEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSessionDto>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(SessionService::update_session(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:delete"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_session(
    State(state): State<AppState>,
    _guard: RequireSessionDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SessionService::delete_session(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
