use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{AgentFormation, EnrollAgentDto, SessionEnrollment, UpdateEnrollmentDto};

use crate::middleware::permission::{RequireSessionEdit, RequireSessionView};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/agents",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Enrolled agents", body = Vec<SessionEnrollment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:view"),
        (status = 404, description = "Session not found")
    ),
    tag = "Enrollments",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_session_enrollments(
    State(state): State<AppState>,
    _guard: RequireSessionView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SessionEnrollment>>, AppError> {
    Ok(Json(
        EnrollmentService::get_session_enrollments(&state.db, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/agents",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = EnrollAgentDto,
    responses(
        (status = 201, description = "Agent enrolled", body = SessionEnrollment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:edit"),
        (status = 404, description = "Session or agent not found"),
        (status = 409, description = "Already enrolled, or session full")
    ),
    tag = "Enrollments",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn enroll_agent(
    State(state): State<AppState>,
    _guard: RequireSessionEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<EnrollAgentDto>,
) -> Result<(StatusCode, Json<SessionEnrollment>), AppError> {
    let enrollment = EnrollmentService::enroll_agent(&state.db, id, dto.agent_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Record an agent's result, score or comment for the session
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/agents/{agent_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("agent_id" = Uuid, Path, description = "Agent ID")
    ),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = AgentFormation),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:edit"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    _guard: RequireSessionEdit,
    Path((id, agent_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<AgentFormation>, AppError> {
    Ok(Json(
        EnrollmentService::update_enrollment(&state.db, id, agent_id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/agents/{agent_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("agent_id" = Uuid, Path, description = "Agent ID")
    ),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires session:edit"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn remove_enrollment(
    State(state): State<AppState>,
    _guard: RequireSessionEdit,
    Path((id, agent_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    EnrollmentService::remove_enrollment(&state.db, id, agent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
