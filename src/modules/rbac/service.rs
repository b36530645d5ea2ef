//! The authorization store.
//!
//! All operations run against the shared pool with no in-memory caching;
//! a decision made here reflects the latest committed assignments. Grants
//! are single atomic inserts backed by the unique triple index, and
//! replacement runs delete-then-insert inside one transaction.

use anyhow::anyhow;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreatePermissionDto, CreateRoleDto, GrantResponse, Permission, Role};

// ============ Role and Permission Services ============

#[instrument(skip(db))]
pub async fn create_role(db: &SqlitePool, dto: CreateRoleDto) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>("INSERT INTO roles (id, name) VALUES (?, ?) RETURNING id, name")
        .bind(Uuid::new_v4())
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::duplicate_name(anyhow!(
                        "A role named '{}' already exists",
                        dto.name
                    ));
                }
            }
            AppError::from(e)
        })
}

#[instrument(skip(db))]
pub async fn create_permission(
    db: &SqlitePool,
    dto: CreatePermissionDto,
) -> Result<Permission, AppError> {
    sqlx::query_as::<_, Permission>(
        "INSERT INTO permissions (id, name) VALUES (?, ?) RETURNING id, name",
    )
    .bind(Uuid::new_v4())
    .bind(&dto.name)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::duplicate_name(anyhow!(
                    "A permission named '{}' already exists",
                    dto.name
                ));
            }
        }
        AppError::from(e)
    })
}

#[instrument(skip(db))]
pub async fn get_roles(db: &SqlitePool) -> Result<Vec<Role>, AppError> {
    let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name")
        .fetch_all(db)
        .await?;

    Ok(roles)
}

#[instrument(skip(db))]
pub async fn get_permissions(db: &SqlitePool) -> Result<Vec<Permission>, AppError> {
    let permissions =
        sqlx::query_as::<_, Permission>("SELECT id, name FROM permissions ORDER BY name")
            .fetch_all(db)
            .await?;

    Ok(permissions)
}

#[instrument(skip(db))]
pub async fn role_by_name(db: &SqlitePool, name: &str) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", name)))
}

#[instrument(skip(db))]
pub async fn permission_by_name(db: &SqlitePool, name: &str) -> Result<Permission, AppError> {
    sqlx::query_as::<_, Permission>("SELECT id, name FROM permissions WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Permission '{}' not found", name)))
}

/// Verifies the user row exists. Shared by grant validation and the
/// administrative query endpoints.
pub async fn ensure_user(db: &SqlitePool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

    Ok(())
}

async fn ensure_role(db: &SqlitePool, role_id: Uuid) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE id = ?")
        .bind(role_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

    Ok(())
}

async fn ensure_permission(db: &SqlitePool, permission_id: Uuid) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM permissions WHERE id = ?")
        .bind(permission_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Permission not found")))?;

    Ok(())
}

async fn ensure_permissions(db: &SqlitePool, permission_ids: &[Uuid]) -> Result<(), AppError> {
    for permission_id in permission_ids {
        ensure_permission(db, *permission_id).await?;
    }

    Ok(())
}

// ============ Grant Services ============

/// Grants one `(user, role, permission)` triple.
///
/// Idempotent: the insert is a single `ON CONFLICT DO NOTHING` statement
/// against the unique triple index, so concurrent grants of the same
/// triple cannot produce duplicates and re-granting is a no-op success.
#[instrument(skip(db))]
pub async fn grant(
    db: &SqlitePool,
    user_id: Uuid,
    role_id: Uuid,
    permission_id: Uuid,
) -> Result<GrantResponse, AppError> {
    ensure_user(db, user_id).await?;
    ensure_role(db, role_id).await?;
    ensure_permission(db, permission_id).await?;

    sqlx::query(
        "INSERT INTO assignments (id, user_id, role_id, permission_id, created_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id, role_id, permission_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role_id)
    .bind(permission_id)
    .bind(Utc::now())
    .execute(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return AppError::constraint_violation(anyhow!(
                    "Grant references a row that no longer exists"
                ));
            }
        }
        AppError::from(e)
    })?;

    Ok(GrantResponse {
        message: "Permission granted".to_string(),
        user_id,
        role_id,
        permission_id,
    })
}

/// Removes every assignment the user holds under the role.
///
/// Succeeds as a no-op when no rows match; the returned count says how
/// many rows were deleted. Assignments under other roles are untouched.
#[instrument(skip(db))]
pub async fn revoke_role(db: &SqlitePool, user_id: Uuid, role_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM assignments WHERE user_id = ? AND role_id = ?")
        .bind(user_id)
        .bind(role_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

/// Replaces the user's grants under a role with exactly the given set.
///
/// Runs delete-then-insert in a single transaction. If any insert fails
/// the transaction rolls back and the prior assignments remain intact.
#[instrument(skip(db))]
pub async fn replace_role_grants(
    db: &SqlitePool,
    user_id: Uuid,
    role_id: Uuid,
    permission_ids: &[Uuid],
) -> Result<(), AppError> {
    ensure_user(db, user_id).await?;
    ensure_role(db, role_id).await?;
    ensure_permissions(db, permission_ids).await?;

    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM assignments WHERE user_id = ? AND role_id = ?")
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    for permission_id in permission_ids {
        sqlx::query(
            "INSERT INTO assignments (id, user_id, role_id, permission_id, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id, role_id, permission_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(role_id)
        .bind(permission_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::constraint_violation(anyhow!(
                        "Grant references a row that no longer exists"
                    ));
                }
            }
            AppError::from(e)
        })?;
    }

    tx.commit().await?;

    Ok(())
}

/// Checks the delegation ceiling: a granter may only hand out a role they
/// hold, and under it only permissions they hold themselves. Holding a
/// permission under a *different* role does not qualify.
#[instrument(skip(db))]
pub async fn ensure_delegable(
    db: &SqlitePool,
    granter_id: Uuid,
    role_id: Uuid,
    permission_ids: &[Uuid],
) -> Result<(), AppError> {
    let granter_holds_role = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM assignments WHERE user_id = ? AND role_id = ?)",
    )
    .bind(granter_id)
    .bind(role_id)
    .fetch_one(db)
    .await?;

    if !granter_holds_role {
        return Err(AppError::forbidden(anyhow!(
            "You cannot assign a role you do not hold"
        )));
    }

    let granter_permissions = role_permission_ids(db, granter_id, role_id).await?;

    for permission_id in permission_ids {
        if !granter_permissions.contains(permission_id) {
            return Err(AppError::forbidden(anyhow!(
                "You cannot assign a permission you do not hold under this role"
            )));
        }
    }

    Ok(())
}

/// Delegated assignment: the granter may only hand out access they hold.
///
/// Fails with 403 before any mutation when [`ensure_delegable`] rejects
/// the set. On success this is [`replace_role_grants`] for the target
/// user.
#[instrument(skip(db))]
pub async fn assign_with_delegation(
    db: &SqlitePool,
    granter_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    permission_ids: &[Uuid],
) -> Result<(), AppError> {
    ensure_delegable(db, granter_id, role_id, permission_ids).await?;
    replace_role_grants(db, user_id, role_id, permission_ids).await
}

// ============ Decision Services ============

/// The core authorization decision: does the user hold the named
/// permission under any role?
///
/// A user with no assignments gets `false` for every name, and an unknown
/// permission name is simply never held - neither case is an error.
#[instrument(skip(db))]
pub async fn has_permission(
    db: &SqlitePool,
    user_id: Uuid,
    permission_name: &str,
) -> Result<bool, AppError> {
    let allowed = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM assignments a
            INNER JOIN permissions p ON a.permission_id = p.id
            WHERE a.user_id = ? AND p.name = ?
        )",
    )
    .bind(user_id)
    .bind(permission_name)
    .fetch_one(db)
    .await?;

    Ok(allowed)
}

#[instrument(skip(db))]
pub async fn holds_role(
    db: &SqlitePool,
    user_id: Uuid,
    role_name: &str,
) -> Result<bool, AppError> {
    let holds = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM assignments a
            INNER JOIN roles r ON a.role_id = r.id
            WHERE a.user_id = ? AND r.name = ?
        )",
    )
    .bind(user_id)
    .bind(role_name)
    .fetch_one(db)
    .await?;

    Ok(holds)
}

/// Distinct role names across the user's assignments, ordered by name.
#[instrument(skip(db))]
pub async fn effective_roles(db: &SqlitePool, user_id: Uuid) -> Result<Vec<String>, AppError> {
    let roles = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT r.name
         FROM roles r
         INNER JOIN assignments a ON r.id = a.role_id
         WHERE a.user_id = ?
         ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(roles)
}

/// Distinct permission names across the user's assignments, ordered by
/// name. The role each permission was granted under is not part of the
/// answer.
#[instrument(skip(db))]
pub async fn effective_permissions(
    db: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<String>, AppError> {
    let permissions = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT p.name
         FROM permissions p
         INNER JOIN assignments a ON p.id = a.permission_id
         WHERE a.user_id = ?
         ORDER BY p.name",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(permissions)
}

/// Permission ids the user holds under one specific role.
#[instrument(skip(db))]
pub async fn role_permission_ids(
    db: &SqlitePool,
    user_id: Uuid,
    role_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT permission_id FROM assignments WHERE user_id = ? AND role_id = ?",
    )
    .bind(user_id)
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(ids)
}

/// Permission names the user holds under one specific role, ordered by
/// name.
#[instrument(skip(db))]
pub async fn role_permission_names(
    db: &SqlitePool,
    user_id: Uuid,
    role_id: Uuid,
) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT p.name
         FROM permissions p
         INNER JOIN assignments a ON p.id = a.permission_id
         WHERE a.user_id = ? AND a.role_id = ?
         ORDER BY p.name",
    )
    .bind(user_id)
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(names)
}
