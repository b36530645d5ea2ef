use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &SqlitePool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let username_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)",
        )
        .bind(&dto.username)
        .fetch_one(db)
        .await?;

        if username_taken {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Username already exists"
            )));
        }

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = ?)")
                .bind(&dto.email)
                .fetch_one(db)
                .await?;

        if email_taken {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email already exists"
            )));
        }

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
        .bind(Utc::now())
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &SqlitePool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            username: String,
            email: String,
            password_hash: String,
            full_name: Option<String>,
            status: String,
            created_at: DateTime<Utc>,
        }

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, email, password_hash, full_name, status, created_at
             FROM users WHERE username = ?",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid username or password")))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password_hash)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid username or password"
            )));
        }

        let last_login_at = Utc::now();
        sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(last_login_at)
            .bind(user_with_password.id)
            .execute(db)
            .await?;

        let access_token = create_access_token(
            user_with_password.id,
            &user_with_password.username,
            jwt_config,
        )?;

        let user = User {
            id: user_with_password.id,
            username: user_with_password.username,
            email: user_with_password.email,
            full_name: user_with_password.full_name,
            status: user_with_password.status,
            last_login_at: Some(last_login_at),
            created_at: user_with_password.created_at,
        };

        Ok(LoginResponse { access_token, user })
    }
}
