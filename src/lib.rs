//! # Fusebox API
//!
//! A REST API built with Rust, Axum, and SQLite that manages dashboard access
//! through per-user role and permission grants.
//!
//! ## Overview
//!
//! Fusebox is the backend for a role-gated dashboard suite with features
//! including:
//!
//! - **Authentication**: JWT-based authentication with bcrypt password hashing
//! - **Fine-Grained Authorization**: permissions are granted per user under a
//!   role, not attached to the role itself
//! - **Delegated Grants**: non-Super-Admins can only hand out roles and
//!   permissions they themselves hold
//! - **Admin Management**: create, list, update, and deactivate
//!   administrative users
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── cli/              # CLI commands (e.g., create-superadmin)
//! ├── config/           # Configuration modules (JWT, database, CORS, seed)
//! ├── middleware/       # Auth middleware and extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Authentication (register, login)
//! │   ├── users/       # Self-service profile endpoints
//! │   ├── admins/      # Administrative user management
//! │   └── rbac/        # Roles, permissions, and grants
//! └── utils/           # Shared utilities
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## Authorization Model
//!
//! Authorization state is a single set of `(user, role, permission)` rows.
//! A user "holds a role" when at least one permission is granted under it,
//! and a permission check passes when any of the user's rows carries that
//! permission, regardless of role. Deleting those rows revokes access on
//! the next request; tokens carry identity only.
//!
//! ### Seeded Roles
//!
//! | Role | Default permissions |
//! |------|---------------------|
//! | Super-Admin | all, including `admin_panel` and `role_assignment` |
//! | Admin | all, including `admin_panel` and `role_assignment` |
//! | Sub-Admin | `home_dashboard`, `user_dashboard`, `admin_panel` |
//! | Analyst | `home_dashboard`, `analytics_dashboard` |
//! | Inspector | `home_dashboard`, `user_dashboard` |
//!
//! ## Quick Start
//!
//! ### Environment Variables
//!
//! ```bash
//! DATABASE_URL=sqlite://fusebox.db
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=3600
//! ALLOWED_ORIGINS=http://localhost:3000
//! SEED_CONFIG=seed.json   # optional override of the built-in role table
//! ```
//!
//! ### Creating a Super-Admin
//!
//! The first Super-Admin is created via CLI:
//!
//! ```bash
//! cargo run -- create-superadmin --username root --email root@example.com --password changeme123
//! ```
//!
//! ### API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface utilities
//! - [`config`]: Application configuration
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Request logging middleware
//! - [`middleware`]: Authentication and permission-gate middleware
//! - [`modules`]: Feature modules (auth, users, admins, rbac)
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`utils`]: Shared utilities (errors, JWT, password hashing)
//! - [`validator`]: Request validation utilities
//!
//! ## Security Considerations
//!
//! - Passwords are hashed using bcrypt
//! - JWT secrets should be cryptographically random
//! - Tokens never embed roles or permissions; every check reads the store
//! - Creating admin users over the API requires the Super-Admin role

pub mod cli;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
