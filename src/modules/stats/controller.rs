use axum::{Json, extract::State};
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_models::DashboardStats;

use crate::middleware::permission::RequireDashboardView;
use crate::modules::sessions::service::today;
use crate::modules::stats::service::StatsService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires dashboard:view")
    ),
    tag = "Dashboard",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    _guard: RequireDashboardView,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(StatsService::get_dashboard_stats(&state.db, today()).await?))
}
