//! Middleware modules for request processing.
//!
//! This module contains middleware and extractors for handling
//! authentication and authorization.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token validation and the [`auth::AuthUser`] extractor
//! - [`permission`]: Store-backed permission and role gates
//!
//! # Authorization Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts the user's identity
//! 3. A gate ([`permission::require_permission`] or an in-handler
//!    [`permission::ensure_role`] check) queries the assignment store for
//!    that identity
//! 4. The handler executes only when the store grants the permission
//!
//! The store is consulted on every request. Tokens never cache roles or
//! permissions, so revocation does not have to wait for token expiry.

pub mod auth;
pub mod permission;
