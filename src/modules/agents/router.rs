use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_agent, delete_agent, get_agent, get_agent_formations, get_agents, update_agent,
};

pub fn init_agents_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_agent).get(get_agents))
        .route(
            "/{id}",
            get(get_agent).put(update_agent).delete(delete_agent),
        )
        .route("/{id}/formations", get(get_agent_formations))
}
