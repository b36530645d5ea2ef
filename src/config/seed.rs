//! Role and permission seed data.
//!
//! The authorization store holds permissions per `(user, role, permission)`
//! assignment row, so there is no role -> permission table to consult at
//! runtime. This config is the single source for two things:
//!
//! 1. which roles and permissions must exist (applied idempotently at
//!    startup by [`crate::modules::rbac::seed::initialize`]), and
//! 2. the default permission set granted when an administrative user is
//!    created with a given role.
//!
//! # Environment Variables
//!
//! - `SEED_CONFIG`: optional path to a JSON file overriding the built-in
//!   table. The file holds `{"roles": [{"name": "...", "permissions":
//!   ["..."]}]}`.

use std::env;
use std::fs;

use serde::{Deserialize, Serialize};

/// Role that may create administrative-tier users.
pub const SUPER_ADMIN_ROLE: &str = "Super-Admin";

/// Permission gating the administrative user endpoints.
pub const ADMIN_PANEL_PERMISSION: &str = "admin_panel";

/// Permission gating role, permission, and grant management endpoints.
pub const ROLE_ASSIGNMENT_PERMISSION: &str = "role_assignment";

/// Roles counted as administrative-tier by listing and metrics.
pub const ADMIN_TIER_ROLES: [&str; 4] = ["Super-Admin", "Admin", "Sub-Admin", "Analyst"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedConfig {
    pub roles: Vec<RoleSeed>,
}

impl SeedConfig {
    /// Loads the seed table, preferring a `SEED_CONFIG` JSON file when set.
    ///
    /// # Panics
    ///
    /// Panics when the file is set but unreadable or malformed. Seed data
    /// shapes every authorization decision, so a broken override must not
    /// silently fall back.
    pub fn from_env() -> Self {
        match env::var("SEED_CONFIG") {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .unwrap_or_else(|e| panic!("Failed to read seed config {}: {}", path, e));
                serde_json::from_str(&contents)
                    .unwrap_or_else(|e| panic!("Invalid seed config {}: {}", path, e))
            }
            Err(_) => Self::default(),
        }
    }

    /// Default permission names for a role, if the role is seeded.
    pub fn role_defaults(&self, role_name: &str) -> Option<&[String]> {
        self.roles
            .iter()
            .find(|r| r.name == role_name)
            .map(|r| r.permissions.as_slice())
    }

    /// All distinct permission names across the table, sorted.
    pub fn permission_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .roles
            .iter()
            .flat_map(|r| r.permissions.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        let all = vec![
            "home_dashboard".to_string(),
            "analytics_dashboard".to_string(),
            "user_dashboard".to_string(),
            ADMIN_PANEL_PERMISSION.to_string(),
            ROLE_ASSIGNMENT_PERMISSION.to_string(),
        ];

        Self {
            roles: vec![
                RoleSeed {
                    name: SUPER_ADMIN_ROLE.to_string(),
                    permissions: all.clone(),
                },
                RoleSeed {
                    name: "Admin".to_string(),
                    permissions: all,
                },
                RoleSeed {
                    name: "Sub-Admin".to_string(),
                    permissions: vec![
                        "home_dashboard".to_string(),
                        "user_dashboard".to_string(),
                        ADMIN_PANEL_PERMISSION.to_string(),
                    ],
                },
                RoleSeed {
                    name: "Analyst".to_string(),
                    permissions: vec![
                        "home_dashboard".to_string(),
                        "analytics_dashboard".to_string(),
                    ],
                },
                RoleSeed {
                    name: "Inspector".to_string(),
                    permissions: vec!["home_dashboard".to_string(), "user_dashboard".to_string()],
                },
            ],
        }
    }
}
