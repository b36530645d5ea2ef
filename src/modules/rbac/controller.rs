use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::config::seed::SUPER_ADMIN_ROLE;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    CreatePermissionDto, CreateRoleDto, GrantDto, GrantResponse, Permission,
    PermissionCheckParams, PermissionCheckResponse, ReplaceGrantsDto, Role,
};
use super::service;

// ============ Role and Permission Endpoints ============

#[utoipa::path(
    post,
    path = "/api/rbac/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Role name already exists")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    let role = service::create_role(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/api/rbac/roles",
    responses(
        (status = 200, description = "List of roles", body = Vec<Role>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn get_roles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = service::get_roles(&state.db).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    post,
    path = "/api/rbac/permissions",
    request_body = CreatePermissionDto,
    responses(
        (status = 201, description = "Permission created", body = Permission),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Permission name already exists")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn create_permission(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePermissionDto>,
) -> Result<(StatusCode, Json<Permission>), AppError> {
    let permission = service::create_permission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    get,
    path = "/api/rbac/permissions",
    responses(
        (status = 200, description = "List of permissions", body = Vec<Permission>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn get_permissions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = service::get_permissions(&state.db).await?;
    Ok(Json(permissions))
}

// ============ Grant Endpoints ============

/// Grant a single (user, role, permission) triple.
///
/// Super-Admins grant freely; any other caller is held to the delegation
/// ceiling and can only grant what they themselves hold under the role.
#[utoipa::path(
    post,
    path = "/api/rbac/grants",
    request_body = GrantDto,
    responses(
        (status = 200, description = "Grant recorded (idempotent)", body = GrantResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Delegation ceiling exceeded"),
        (status = 404, description = "User, role, or permission not found")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn grant_permission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<GrantDto>,
) -> Result<Json<GrantResponse>, AppError> {
    let actor_id = auth_user.user_id()?;

    let is_super = service::holds_role(&state.db, actor_id, SUPER_ADMIN_ROLE).await?;
    if !is_super {
        service::ensure_delegable(&state.db, actor_id, dto.role_id, &[dto.permission_id]).await?;
    }

    let response = service::grant(&state.db, dto.user_id, dto.role_id, dto.permission_id).await?;
    Ok(Json(response))
}

/// Replace the target user's grants under a role with exactly the given
/// permission set.
#[utoipa::path(
    put,
    path = "/api/rbac/users/{user_id}/roles/{role_id}",
    params(
        ("user_id" = Uuid, Path, description = "Target user ID"),
        ("role_id" = Uuid, Path, description = "Role ID")
    ),
    request_body = ReplaceGrantsDto,
    responses(
        (status = 200, description = "Permissions now held under the role", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Delegation ceiling exceeded"),
        (status = 404, description = "User, role, or permission not found")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn replace_role_grants(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((user_id, role_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<ReplaceGrantsDto>,
) -> Result<Json<Vec<String>>, AppError> {
    let actor_id = auth_user.user_id()?;

    let is_super = service::holds_role(&state.db, actor_id, SUPER_ADMIN_ROLE).await?;
    if is_super {
        service::replace_role_grants(&state.db, user_id, role_id, &dto.permission_ids).await?;
    } else {
        service::assign_with_delegation(&state.db, actor_id, user_id, role_id, &dto.permission_ids)
            .await?;
    }

    let names = service::role_permission_names(&state.db, user_id, role_id).await?;
    Ok(Json(names))
}

#[utoipa::path(
    delete,
    path = "/api/rbac/users/{user_id}/roles/{role_id}",
    params(
        ("user_id" = Uuid, Path, description = "Target user ID"),
        ("role_id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role revoked (no-op when nothing was assigned)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn revoke_role(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((user_id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    service::revoke_role(&state.db, user_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ Query Endpoints ============

#[utoipa::path(
    get,
    path = "/api/rbac/users/{user_id}/roles",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Distinct role names from the user's assignments", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn get_user_roles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    service::ensure_user(&state.db, user_id).await?;
    let roles = service::effective_roles(&state.db, user_id).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/rbac/users/{user_id}/permissions",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Distinct permission names from the user's assignments", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    service::ensure_user(&state.db, user_id).await?;
    let permissions = service::effective_permissions(&state.db, user_id).await?;
    Ok(Json(permissions))
}

#[utoipa::path(
    get,
    path = "/api/rbac/users/{user_id}/check",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("permission" = String, Query, description = "Permission name to check")
    ),
    responses(
        (status = 200, description = "Authorization decision", body = PermissionCheckResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    tag = "Authorization",
    security(("bearer_auth" = []))
)]
pub async fn check_permission(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PermissionCheckParams>,
) -> Result<Json<PermissionCheckResponse>, AppError> {
    service::ensure_user(&state.db, user_id).await?;
    let allowed = service::has_permission(&state.db, user_id, &params.permission).await?;

    Ok(Json(PermissionCheckResponse {
        user_id,
        permission: params.permission,
        allowed,
    }))
}
