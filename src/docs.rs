use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admins::model::{
    AdminFilterParams, AdminMetrics, AdminUser, CreateAdminDto, StatusResponse, UpdateAdminDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterRequestDto};
use crate::modules::rbac::model::{
    CreatePermissionDto, CreateRoleDto, GrantDto, GrantResponse, Permission,
    PermissionCheckResponse, ReplaceGrantsDto, Role,
};
use crate::modules::users::model::{AccessSummary, ChangePasswordDto, UpdateProfileDto, User};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::get_access_summary,
        crate::modules::admins::controller::list_admins,
        crate::modules::admins::controller::create_admin,
        crate::modules::admins::controller::update_admin,
        crate::modules::admins::controller::delete_admin,
        crate::modules::admins::controller::toggle_status,
        crate::modules::admins::controller::get_metrics,
        crate::modules::rbac::controller::create_role,
        crate::modules::rbac::controller::get_roles,
        crate::modules::rbac::controller::create_permission,
        crate::modules::rbac::controller::get_permissions,
        crate::modules::rbac::controller::grant_permission,
        crate::modules::rbac::controller::replace_role_grants,
        crate::modules::rbac::controller::revoke_role,
        crate::modules::rbac::controller::get_user_roles,
        crate::modules::rbac::controller::get_user_permissions,
        crate::modules::rbac::controller::check_permission,
    ),
    components(
        schemas(
            User,
            UpdateProfileDto,
            ChangePasswordDto,
            AccessSummary,
            LoginRequest,
            LoginResponse,
            RegisterRequestDto,
            ErrorResponse,
            AdminUser,
            CreateAdminDto,
            UpdateAdminDto,
            AdminFilterParams,
            AdminMetrics,
            StatusResponse,
            Role,
            Permission,
            CreateRoleDto,
            CreatePermissionDto,
            GrantDto,
            GrantResponse,
            ReplaceGrantsDto,
            PermissionCheckResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User authentication endpoints"),
        (name = "Users", description = "Self-service profile endpoints"),
        (name = "Admins", description = "Administrative user management"),
        (name = "Authorization", description = "Role, permission, and grant management")
    ),
    info(
        title = "Fusebox API",
        version = "0.1.0",
        description = "A dashboard backend built with Rust, Axum, and SQLite featuring JWT authentication and per-user role/permission grants.",
        contact(
            name = "API Support",
            email = "support@fusebox.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
