//! Authorization data models and DTOs.
//!
//! The store is built around three entities and one association:
//!
//! - [`Role`] - a named grouping such as `Admin` or `Analyst`
//! - [`Permission`] - a named capability such as `analytics_dashboard`
//! - [`Assignment`] - one `(user, role, permission)` row; the atomic unit
//!   of granted access
//!
//! A user's effective roles and permissions are the distinct projections
//! of their assignment rows. There is no role -> permission table and no
//! inheritance between roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
}

/// One granted `(user, role, permission)` triple.
///
/// The storage layer enforces uniqueness of the triple, so granting the
/// same combination twice leaves a single row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub permission_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreatePermissionDto {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct GrantDto {
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub permission_id: Uuid,
}

/// Replacement set for a `(user, role)` pair. An empty list revokes the
/// role entirely.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct ReplaceGrantsDto {
    pub permission_ids: Vec<Uuid>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct GrantResponse {
    pub message: String,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub permission_id: Uuid,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct PermissionCheckParams {
    pub permission: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PermissionCheckResponse {
    pub user_id: Uuid,
    pub permission: String,
    pub allowed: bool,
}
