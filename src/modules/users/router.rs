use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    ban_user, create_user, delete_user, get_user, get_users, unban_user, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(get_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/ban", post(ban_user))
        .route("/{id}/unban", post(unban_user))
}
