use axum::{Router, routing::get};

use crate::modules::permissions::controller::get_ui_permission_matrix;
use crate::state::AppState;

use super::controller::{
    create_component, delete_component, get_component, get_components, update_component,
};

pub fn init_ui_components_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_components).post(create_component))
        .route("/permissions", get(get_ui_permission_matrix))
        .route(
            "/{id}",
            get(get_component)
                .put(update_component)
                .delete(delete_component),
        )
}
