use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use helmsman_observability::{
    PrometheusHandle, logging_middleware, metrics_middleware, metrics_router,
};

use crate::docs::ApiDoc;
use crate::modules::agents::init_agents_router;
use crate::modules::auth::init_auth_router;
use crate::modules::cours::init_cours_router;
use crate::modules::formateurs::init_formateurs_router;
use crate::modules::formations::init_formations_router;
use crate::modules::permissions::init_permissions_router;
use crate::modules::resources::init_resources_router;
use crate::modules::roles::init_roles_router;
use crate::modules::sessions::init_sessions_router;
use crate::modules::stats::init_stats_router;
use crate::modules::ui_components::init_ui_components_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .nest("/agents", init_agents_router())
        .nest("/formateurs", init_formateurs_router())
        .nest("/cours", init_cours_router())
        .nest("/formations", init_formations_router())
        .nest("/sessions", init_sessions_router())
        .nest("/stats", init_stats_router())
        .nest("/users", init_users_router())
        .nest("/roles", init_roles_router())
        .nest("/resources", init_resources_router())
        .nest("/permissions", init_permissions_router())
        .nest("/ui-components", init_ui_components_router())
}

/// Builds the application. Every `/api` route except `/api/auth/login` and
/// `/api/auth/logout` is guarded in its handler by a session and a
/// (resource, action) permission.
pub fn init_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/health", get(health_check))
        .nest("/api", api_router())
        .with_state(state.clone());

    if let Some(handle) = metrics {
        router = router.merge(metrics_router(handle));
    }

    router
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
