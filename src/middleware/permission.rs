//! Permission-gate middleware backed by the assignment store.
//!
//! Every check is a fresh read of the `assignments` table. Nothing here
//! consults token claims beyond the user's identity, so a revoked grant
//! takes effect on the request after the revocation commits.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::seed::{ADMIN_PANEL_PERMISSION, ROLE_ASSIGNMENT_PERMISSION};
use crate::middleware::auth::AuthUser;
use crate::modules::rbac::service;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware that rejects the request unless the authenticated user holds
/// the named permission.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = init_admins_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_panel));
/// ```
pub async fn require_permission(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    permission: &'static str,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let user_id = auth_user.user_id()?;

    if !service::has_permission(&state.db, user_id, permission).await? {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Missing required permission: {}",
            permission
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Gate for the administrative user management endpoints.
pub async fn require_admin_panel(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_permission(State(state), req, next, ADMIN_PANEL_PERMISSION).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Gate for role, permission, and grant management endpoints.
pub async fn require_role_assignment(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_permission(State(state), req, next, ROLE_ASSIGNMENT_PERMISSION).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// In-handler guard for a named permission.
pub async fn ensure_permission(
    db: &SqlitePool,
    user_id: Uuid,
    permission: &str,
) -> Result<(), AppError> {
    if !service::has_permission(db, user_id, permission).await? {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Missing required permission: {}",
            permission
        )));
    }
    Ok(())
}

/// In-handler guard for a named role.
pub async fn ensure_role(db: &SqlitePool, user_id: Uuid, role: &str) -> Result<(), AppError> {
    if !service::holds_role(db, user_id, role).await? {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Required role: {}",
            role
        )));
    }
    Ok(())
}
