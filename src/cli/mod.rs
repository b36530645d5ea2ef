use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::seed::{SUPER_ADMIN_ROLE, SeedConfig};
use crate::modules::rbac::seed;
use crate::modules::rbac::service as rbac_service;
use crate::utils::password::hash_password;

/// Creates a Super-Admin account with the role's full default grant set.
///
/// Applies the role/permission seed first so the grants have something to
/// reference on a fresh database.
pub async fn create_superadmin(
    db: &SqlitePool,
    seed_config: &SeedConfig,
    username: &str,
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    seed::initialize(db, seed_config)
        .await
        .map_err(|e| format!("Failed to apply authorization seed: {}", e.error))?;

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = Uuid::new_v4();
    let result = sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, full_name, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(user_id)
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(full_name)
    .bind(chrono::Utc::now())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this username already exists".into());
    }

    let role = rbac_service::role_by_name(db, SUPER_ADMIN_ROLE)
        .await
        .map_err(|e| format!("Super-Admin role missing after seed: {}", e.error))?;

    let defaults = seed_config
        .role_defaults(SUPER_ADMIN_ROLE)
        .ok_or("No default permissions configured for Super-Admin")?;

    let mut permission_ids = Vec::with_capacity(defaults.len());
    for name in defaults {
        let permission = rbac_service::permission_by_name(db, name)
            .await
            .map_err(|e| format!("Permission missing after seed: {}", e.error))?;
        permission_ids.push(permission.id);
    }

    rbac_service::replace_role_grants(db, user_id, role.id, &permission_ids)
        .await
        .map_err(|e| format!("Failed to grant Super-Admin permissions: {}", e.error))?;

    Ok(())
}
