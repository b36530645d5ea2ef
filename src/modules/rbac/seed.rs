//! Idempotent seeding of roles and permissions.
//!
//! Runs on every boot. Rows are inserted only when their name is absent,
//! so a redeploy never duplicates or mutates existing entries, and
//! operator-created roles and permissions survive untouched.

use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::seed::SeedConfig;
use crate::utils::errors::AppError;

#[instrument(skip(db, config))]
pub async fn initialize(db: &SqlitePool, config: &SeedConfig) -> Result<(), AppError> {
    let mut roles_inserted = 0u64;
    for role in &config.roles {
        let result = sqlx::query(
            "INSERT INTO roles (id, name) VALUES (?, ?) ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(&role.name)
        .execute(db)
        .await?;
        roles_inserted += result.rows_affected();
    }

    let mut permissions_inserted = 0u64;
    for name in config.permission_names() {
        let result = sqlx::query(
            "INSERT INTO permissions (id, name) VALUES (?, ?) ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .execute(db)
        .await?;
        permissions_inserted += result.rows_affected();
    }

    info!(
        roles = config.roles.len(),
        roles_inserted,
        permissions_inserted,
        "Authorization seed applied"
    );

    Ok(())
}
