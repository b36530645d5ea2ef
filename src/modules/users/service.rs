use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::rbac::service as rbac_service;
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::model::{AccessSummary, ChangePasswordDto, UpdateProfileDto, User};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_profile(db: &SqlitePool, user_id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, status, last_login_at, created_at
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", user_id)))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &SqlitePool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        if let Some(email) = &dto.email {
            let email_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM users WHERE email = ? AND id != ?)",
            )
            .bind(email)
            .bind(user_id)
            .fetch_one(db)
            .await?;

            if email_taken {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Email already exists"
                )));
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
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", user_id)))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &SqlitePool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(anyhow::anyhow!("User with id {} not found", user_id))
                })?;

        let is_valid = verify_password(&dto.current_password, &current_hash)?;

        if !is_valid {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(&new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Distinct role and permission names from the user's assignments.
    #[instrument(skip(db))]
    pub async fn access_summary(db: &SqlitePool, user_id: Uuid) -> Result<AccessSummary, AppError> {
        let roles = rbac_service::effective_roles(db, user_id).await?;
        let permissions = rbac_service::effective_permissions(db, user_id).await?;

        Ok(AccessSummary { roles, permissions })
    }
}
