//! Administrative user models and DTOs.
//!
//! "Administrative" here means holding at least one of the admin-tier
//! roles; there is no flag on the users table. Listing and metrics derive
//! membership from the assignment store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An administrative user with their effective role names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub status: String,
    pub roles: Vec<String>,
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating an administrative user.
///
/// The role must be one of the admin-tier roles; the new user receives
/// that role's default permission set from the seed table.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdminDto {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub full_name: Option<String>,
    #[validate(length(min = 1))]
    pub role: String,
}

/// DTO for updating an administrative user.
///
/// A role change replaces the user's grants under the new role with that
/// role's defaults and revokes the other admin-tier roles.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub full_name: Option<String>,
    #[validate(length(min = 1))]
    pub role: Option<String>,
}

/// Query parameters for filtering the admin listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminFilterParams {
    /// Restrict to users holding this role.
    pub role: Option<String>,
    /// Substring match against username, email, and full name.
    pub search: Option<String>,
}

/// Aggregate counts over admin-tier users.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdminMetrics {
    pub total_admins: i64,
    pub active_admins: i64,
    pub sub_admins: i64,
    pub analysts: i64,
}

/// Response for the status toggle endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: String,
}
