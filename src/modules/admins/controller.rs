use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::config::seed::SUPER_ADMIN_ROLE;
use crate::middleware::auth::AuthUser;
use crate::middleware::permission::ensure_role;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AdminFilterParams, AdminMetrics, AdminUser, CreateAdminDto, StatusResponse, UpdateAdminDto,
};
use super::service;

/// List admin-tier users, with optional role and search filters
#[utoipa::path(
    get,
    path = "/api/admins",
    params(
        ("role" = Option<String>, Query, description = "Restrict to users holding this role"),
        ("search" = Option<String>, Query, description = "Substring match on username, email, and full name")
    ),
    responses(
        (status = 200, description = "Admin users with their roles", body = Vec<AdminUser>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<AdminFilterParams>,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    let admins = service::list_admins(&state.db, params).await?;
    Ok(Json(admins))
}

/// Create an admin-tier user (Super-Admin only)
#[utoipa::path(
    post,
    path = "/api/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 201, description = "Admin user created with the role's default permissions", body = AdminUser),
        (status = 400, description = "Bad request - validation error, duplicate user, or non-admin role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a Super-Admin", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let actor_id = auth_user.user_id()?;
    ensure_role(&state.db, actor_id, SUPER_ADMIN_ROLE).await?;

    let admin = service::create_admin(&state.db, &state.seed_config, dto).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// Update an admin-tier user's profile or role
#[utoipa::path(
    put,
    path = "/api/admins/{id}",
    params(
        ("id" = Uuid, Path, description = "Admin user ID")
    ),
    request_body = UpdateAdminDto,
    responses(
        (status = 200, description = "Updated admin user", body = AdminUser),
        (status = 400, description = "Bad request - validation error or non-admin role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Delegation ceiling exceeded", body = ErrorResponse),
        (status = 404, description = "Admin user not found", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn update_admin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminDto>,
) -> Result<Json<AdminUser>, AppError> {
    let actor_id = auth_user.user_id()?;
    let admin = service::update_admin(&state.db, &state.seed_config, actor_id, id, dto).await?;
    Ok(Json(admin))
}

/// Delete an admin-tier user and all their assignments
#[utoipa::path(
    delete,
    path = "/api/admins/{id}",
    params(
        ("id" = Uuid, Path, description = "Admin user ID")
    ),
    responses(
        (status = 204, description = "Admin user deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Admin user not found", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_admin(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle an admin-tier user between Active and Inactive
#[utoipa::path(
    patch,
    path = "/api/admins/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Admin user ID")
    ),
    responses(
        (status = 200, description = "New status", body = StatusResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Admin user not found", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn toggle_status(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    let response = service::toggle_status(&state.db, id).await?;
    Ok(Json(response))
}

/// Aggregate counts over admin-tier users
#[utoipa::path(
    get,
    path = "/api/admins/metrics",
    responses(
        (status = 200, description = "Admin metrics", body = AdminMetrics),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
pub async fn get_metrics(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<AdminMetrics>, AppError> {
    let metrics = service::metrics(&state.db).await?;
    Ok(Json(metrics))
}
