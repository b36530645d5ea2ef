use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

use super::controller::{
    create_admin, delete_admin, get_metrics, list_admins, toggle_status, update_admin,
};

pub fn init_admins_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/metrics", get(get_metrics))
        .route("/{id}", put(update_admin).delete(delete_admin))
        .route("/{id}/status", patch(toggle_status))
}
