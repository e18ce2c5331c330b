use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_models::{LoginRequest, LoginResponse, MeResponse};

use crate::middleware::RequestContext;
use crate::middleware::session::{cleared_session_cookie, session_cookie};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials or banned account")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    let cookie = session_cookie(
        response.token.clone(),
        &state.session_config,
        &state.jwt_config,
    );
    Ok((jar.add(cookie), Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(cleared_session_cookie(&state.session_config)),
        StatusCode::NO_CONTENT,
    )
}

/// Current user, role, permissions and enabled UI components
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Authentication",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, ctx))]
pub async fn me(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(AuthService::me(&state.db, &ctx).await?))
}
