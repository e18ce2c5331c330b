use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_resource, delete_resource, get_resource, get_resources, update_resource,
};

pub fn init_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_resources).post(create_resource))
        .route(
            "/{name}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
}
