use crate::modules::users::controller::{
    change_password, get_access_summary, get_profile, update_profile,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile).put(update_profile))
        .route("/me/password", put(change_password))
        .route("/me/access", get(get_access_summary))
}
