use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    check_permission, create_permission, create_role, get_permissions, get_roles,
    get_user_permissions, get_user_roles, grant_permission, replace_role_grants, revoke_role,
};

pub fn init_rbac_router() -> Router<AppState> {
    Router::new()
        .route("/roles", post(create_role).get(get_roles))
        .route("/permissions", post(create_permission).get(get_permissions))
        .route("/grants", post(grant_permission))
        .route(
            "/users/{user_id}/roles/{role_id}",
            put(replace_role_grants).delete(revoke_role),
        )
        .route("/users/{user_id}/roles", get(get_user_roles))
        .route("/users/{user_id}/permissions", get(get_user_permissions))
        .route("/users/{user_id}/check", get(check_permission))
}
