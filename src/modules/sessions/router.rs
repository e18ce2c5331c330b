use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::enrollments::controller::{
    enroll_agent, get_session_enrollments, remove_enrollment, update_enrollment,
};
use crate::state::AppState;

use super::controller::{
    create_session, delete_session, get_session, get_sessions, update_session,
};

pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_sessions).post(create_session))
        .route(
            "/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route(
            "/{id}/agents",
            get(get_session_enrollments).post(enroll_agent),
        )
        .route(
            "/{id}/agents/{agent_id}",
            put(update_enrollment).delete(remove_enrollment),
        )
}
