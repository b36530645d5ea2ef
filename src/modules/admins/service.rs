use anyhow::anyhow;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::seed::{ADMIN_TIER_ROLES, SUPER_ADMIN_ROLE, SeedConfig};
use crate::modules::rbac::service as rbac_service;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

use super::model::{
    AdminFilterParams, AdminMetrics, AdminUser, CreateAdminDto, StatusResponse, UpdateAdminDto,
};

// ============ Lookup Helpers ============

/// Fetches the user row, requiring at least one admin-tier role.
async fn admin_user_row(db: &SqlitePool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.full_name, u.status, u.last_login_at, u.created_at
         FROM users u
         WHERE u.id = ? AND EXISTS (
             SELECT 1 FROM assignments a
             INNER JOIN roles r ON r.id = a.role_id
             WHERE a.user_id = u.id AND r.name IN (?, ?, ?, ?)
         )",
    )
    .bind(id)
    .bind(ADMIN_TIER_ROLES[0])
    .bind(ADMIN_TIER_ROLES[1])
    .bind(ADMIN_TIER_ROLES[2])
    .bind(ADMIN_TIER_ROLES[3])
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow!("Admin user not found")))
}

async fn load_admin(db: &SqlitePool, user: User) -> Result<AdminUser, AppError> {
    let roles = rbac_service::effective_roles(db, user.id).await?;

    Ok(AdminUser {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        status: user.status,
        roles,
        last_login_at: user.last_login_at,
        created_at: user.created_at,
    })
}

/// Resolves the role's default permission names from the seed table,
/// rejecting roles outside the admin tier.
fn tier_defaults<'a>(seed: &'a SeedConfig, role_name: &str) -> Result<&'a [String], AppError> {
    if !ADMIN_TIER_ROLES.contains(&role_name) {
        return Err(AppError::bad_request(anyhow!(
            "Role '{}' is not an administrative role",
            role_name
        )));
    }

    seed.role_defaults(role_name).ok_or_else(|| {
        AppError::bad_request(anyhow!(
            "No default permissions configured for role '{}'",
            role_name
        ))
    })
}

async fn resolve_permission_ids(
    db: &SqlitePool,
    names: &[String],
) -> Result<Vec<Uuid>, AppError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let permission = rbac_service::permission_by_name(db, name).await?;
        ids.push(permission.id);
    }
    Ok(ids)
}

// ============ Admin Services ============

#[instrument(skip(db))]
pub async fn list_admins(
    db: &SqlitePool,
    params: AdminFilterParams,
) -> Result<Vec<AdminUser>, AppError> {
    let mut query = String::from(
        "SELECT u.id, u.username, u.email, u.full_name, u.status, u.last_login_at, u.created_at
         FROM users u
         WHERE EXISTS (
             SELECT 1 FROM assignments a
             INNER JOIN roles r ON r.id = a.role_id
             WHERE a.user_id = u.id AND r.name IN (?, ?, ?, ?)
         )",
    );

    if params.role.is_some() {
        query.push_str(
            " AND EXISTS (
                 SELECT 1 FROM assignments a
                 INNER JOIN roles r ON r.id = a.role_id
                 WHERE a.user_id = u.id AND r.name = ?
             )",
        );
    }

    if params.search.is_some() {
        query.push_str(
            " AND (u.username LIKE ? OR u.email LIKE ? OR COALESCE(u.full_name, '') LIKE ?)",
        );
    }

    query.push_str(" ORDER BY u.username");

    let mut query_builder = sqlx::query_as::<_, User>(&query);
    for name in ADMIN_TIER_ROLES {
        query_builder = query_builder.bind(name);
    }

    if let Some(role) = &params.role {
        query_builder = query_builder.bind(role);
    }

    if let Some(search) = &params.search {
        let pattern = format!("%{}%", search);
        query_builder = query_builder
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern);
    }

    let users = query_builder.fetch_all(db).await?;

    let mut admins = Vec::with_capacity(users.len());
    for user in users {
        admins.push(load_admin(db, user).await?);
    }

    Ok(admins)
}

/// Creates an admin-tier user and grants the role's default permission
/// set under that role.
#[instrument(skip(db, seed, dto))]
pub async fn create_admin(
    db: &SqlitePool,
    seed: &SeedConfig,
    dto: CreateAdminDto,
) -> Result<AdminUser, AppError> {
    let defaults = tier_defaults(seed, &dto.role)?;
    let role = rbac_service::role_by_name(db, &dto.role).await?;
    let permission_ids = resolve_permission_ids(db, defaults).await?;

    let hashed_password = hash_password(&dto.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash, full_name, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id, username, email, full_name, status, last_login_at, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&dto.username)
    .bind(&dto.email)
    .bind(&hashed_password)
    .bind(&dto.full_name)
    .bind(chrono::Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::bad_request(anyhow!(
                    "A user with that username or email already exists"
                ));
            }
        }
        AppError::from(e)
    })?;

    rbac_service::replace_role_grants(db, user.id, role.id, &permission_ids).await?;

    load_admin(db, user).await
}

/// Updates profile fields and, when a role is given, moves the user onto
/// that role's default permission set.
///
/// Non-Super-Admin callers go through the delegation ceiling for the
/// grant, so they can only hand out what they themselves hold.
#[instrument(skip(db, seed, dto))]
pub async fn update_admin(
    db: &SqlitePool,
    seed: &SeedConfig,
    actor_id: Uuid,
    id: Uuid,
    dto: UpdateAdminDto,
) -> Result<AdminUser, AppError> {
    admin_user_row(db, id).await?;

    if let Some(email) = &dto.email {
        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = ? AND id != ?)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(db)
        .await?;

        if email_taken {
            return Err(AppError::bad_request(anyhow!("Email already exists")));
        }
    }

    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET email = COALESCE(?, email),
             full_name = COALESCE(?, full_name)
         WHERE id = ?
         RETURNING id, username, email, full_name, status, last_login_at, created_at",
    )
    .bind(&dto.email)
    .bind(&dto.full_name)
    .bind(id)
    .fetch_one(db)
    .await?;

    if let Some(role_name) = &dto.role {
        let defaults = tier_defaults(seed, role_name)?;
        let role = rbac_service::role_by_name(db, role_name).await?;
        let permission_ids = resolve_permission_ids(db, defaults).await?;

        let is_super = rbac_service::holds_role(db, actor_id, SUPER_ADMIN_ROLE).await?;
        if is_super {
            rbac_service::replace_role_grants(db, id, role.id, &permission_ids).await?;
        } else {
            rbac_service::assign_with_delegation(db, actor_id, id, role.id, &permission_ids)
                .await?;
        }

        // The new role is granted before the old ones go, so a failed
        // grant never leaves the user outside the admin tier.
        sqlx::query(
            "DELETE FROM assignments
             WHERE user_id = ? AND role_id IN (
                 SELECT id FROM roles WHERE name IN (?, ?, ?, ?) AND name != ?
             )",
        )
        .bind(id)
        .bind(ADMIN_TIER_ROLES[0])
        .bind(ADMIN_TIER_ROLES[1])
        .bind(ADMIN_TIER_ROLES[2])
        .bind(ADMIN_TIER_ROLES[3])
        .bind(role_name)
        .execute(db)
        .await?;
    }

    load_admin(db, user).await
}

/// Deletes the user row; assignment rows go with it via cascade.
#[instrument(skip(db))]
pub async fn delete_admin(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
    admin_user_row(db, id).await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

#[instrument(skip(db))]
pub async fn toggle_status(db: &SqlitePool, id: Uuid) -> Result<StatusResponse, AppError> {
    admin_user_row(db, id).await?;

    let status = sqlx::query_scalar::<_, String>(
        "UPDATE users
         SET status = CASE WHEN status = 'Active' THEN 'Inactive' ELSE 'Active' END
         WHERE id = ?
         RETURNING status",
    )
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(StatusResponse { id, status })
}

#[instrument(skip(db))]
pub async fn metrics(db: &SqlitePool) -> Result<AdminMetrics, AppError> {
    let metrics = sqlx::query_as::<_, AdminMetrics>(
        "SELECT
             COUNT(*) AS total_admins,
             COALESCE(SUM(CASE WHEN u.status = 'Active' THEN 1 ELSE 0 END), 0) AS active_admins,
             COALESCE(SUM(CASE WHEN EXISTS (
                 SELECT 1 FROM assignments a
                 INNER JOIN roles r ON r.id = a.role_id
                 WHERE a.user_id = u.id AND r.name = ?
             ) THEN 1 ELSE 0 END), 0) AS sub_admins,
             COALESCE(SUM(CASE WHEN EXISTS (
                 SELECT 1 FROM assignments a
                 INNER JOIN roles r ON r.id = a.role_id
                 WHERE a.user_id = u.id AND r.name = ?
             ) THEN 1 ELSE 0 END), 0) AS analysts
         FROM users u
         WHERE EXISTS (
             SELECT 1 FROM assignments a
             INNER JOIN roles r ON r.id = a.role_id
             WHERE a.user_id = u.id AND r.name IN (?, ?, ?, ?)
         )",
    )
    .bind("Sub-Admin")
    .bind("Analyst")
    .bind(ADMIN_TIER_ROLES[0])
    .bind(ADMIN_TIER_ROLES[1])
    .bind(ADMIN_TIER_ROLES[2])
    .bind(ADMIN_TIER_ROLES[3])
    .fetch_one(db)
    .await?;

    Ok(metrics)
}
