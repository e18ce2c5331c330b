use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    Agent, AgentEnrollment, AgentFilterParams, CreateAgentDto, PaginatedAgentsResponse,
    UpdateAgentDto,
};

use crate::middleware::permission::{
    RequireAgentCreate, RequireAgentDelete, RequireAgentEdit, RequireAgentView,
};
use crate::modules::agents::service::AgentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/agents",
    request_body = CreateAgentDto,
    responses(
        (status = 201, description = "Agent created", body = Agent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:create"),
        (status = 409, description = "Matricule or email already in use")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard, dto))]
pub async fn create_agent(
    State(state): State<AppState>,
    _guard: RequireAgentCreate,
    ValidatedJson(dto): ValidatedJson<CreateAgentDto>,
) -> Result<(StatusCode, Json<Agent>), AppError> {
    let agent = AgentService::create_agent(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

#[utoipa::path(
    get,
    path = "/api/agents",
    params(AgentFilterParams),
    responses(
        (status = 200, description = "Paginated agents", body = PaginatedAgentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:view")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_agents(
    State(state): State<AppState>,
    _guard: RequireAgentView,
    Query(filters): Query<AgentFilterParams>,
) -> Result<Json<PaginatedAgentsResponse>, AppError> {
    Ok(Json(AgentService::get_agents(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent details", body = Agent),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:view"),
        (status = 404, description = "Agent not found")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_agent(
    State(state): State<AppState>,
    _guard: RequireAgentView,
    Path(id): Path<Uuid>,
) -> Result<Json<Agent>, AppError> {
    Ok(Json(AgentService::get_agent(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    request_body = UpdateAgentDto,
    responses(
        (status = 200, description = "Agent updated", body = Agent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:edit"),
        (status = 404, description = "Agent not found"),
        (status = 409, description = "Matricule or email already in use")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard, dto))]
pub async fn update_agent(
    State(state): State<AppState>,
    _guard: RequireAgentEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAgentDto>,
) -> Result<Json<Agent>, AppError> {
    Ok(Json(AgentService::update_agent(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:delete"),
        (status = 404, description = "Agent not found")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn delete_agent(
    State(state): State<AppState>,
    _guard: RequireAgentDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AgentService::delete_agent(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Formations the agent is or was enrolled in
#[utoipa::path(
    get,
    path = "/api/agents/{id}/formations",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent enrollments", body = Vec<AgentEnrollment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires agent:view"),
        (status = 404, description = "Agent not found")
    ),
    tag = "Agents",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_agent_formations(
    State(state): State<AppState>,
    _guard: RequireAgentView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AgentEnrollment>>, AppError> {
    Ok(Json(AgentService::get_agent_formations(&state.db, id).await?))
}
