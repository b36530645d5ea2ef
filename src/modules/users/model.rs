//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - Account record as stored in the database (never carries the
//!   password hash)
//! - [`AccessSummary`] - Effective roles and permissions projected from the
//!   assignment store
//!
//! # Request DTOs
//!
//! - [`UpdateProfileDto`] - Update the caller's own profile
//! - [`ChangePasswordDto`] - Change the caller's password

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user account.
///
/// Roles and permissions are not part of this struct; they live in the
/// assignment store and are projected on demand.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub status: String,
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for updating the caller's own profile.
///
/// Both fields are optional; omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub full_name: Option<String>,
}

/// DTO for changing the caller's password.
///
/// Requires the current password for verification before
/// allowing the password change.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    #[schema(example = "newPassword123")]
    pub new_password: String,
}

/// Effective roles and permissions for a user.
///
/// Distinct projections over the user's assignment triples. A role appears
/// here as long as at least one permission is granted under it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessSummary {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}
