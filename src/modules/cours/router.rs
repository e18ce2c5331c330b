use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    assign_formateur, create_cours, delete_cours, get_cours, get_cours_formateurs,
    get_cours_list, unassign_formateur, update_cours,
};

pub fn init_cours_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cours).get(get_cours_list))
        .route(
            "/{id}",
            get(get_cours).put(update_cours).delete(delete_cours),
        )
        .route(
            "/{id}/formateurs",
            get(get_cours_formateurs).post(assign_formateur),
        )
        .route(
            "/{id}/formateurs/{formateur_id}",
            delete(unassign_formateur),
        )
}
