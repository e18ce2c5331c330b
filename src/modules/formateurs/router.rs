use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_formateur, delete_formateur, get_formateur, get_formateur_cours, get_formateurs,
    update_formateur,
};

pub fn init_formateurs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_formateur).get(get_formateurs))
        .route(
            "/{id}",
            get(get_formateur)
                .put(update_formateur)
                .delete(delete_formateur),
        )
        .route("/{id}/cours", get(get_formateur_cours))
}
