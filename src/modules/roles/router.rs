use axum::{Router, routing::get};

use crate::modules::permissions::controller::{
    get_role_permissions, get_role_ui_permissions, update_role_permissions,
    update_role_ui_permissions,
};
use crate::state::AppState;

use super::controller::{create_role, delete_role, get_role, get_roles, update_role};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_roles).post(create_role))
        .route(
            "/{name}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .route(
            "/{name}/permissions",
            get(get_role_permissions).put(update_role_permissions),
        )
        .route(
            "/{name}/ui-permissions",
            get(get_role_ui_permissions).put(update_role_ui_permissions),
        )
}
