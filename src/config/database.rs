//! Database configuration and connection pool initialization.
//!
//! This module handles SQLite connection pool setup using SQLx. The
//! database URL is read from the `DATABASE_URL` environment variable and
//! defaults to a file next to the binary.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite connection string (default: `sqlite://fusebox.db`)
//!
//! # Connection String Format
//!
//! ```text
//! sqlite://path/to/database.db
//! ```
//!
//! # Panics
//!
//! The [`init_db_pool`] function will panic if the URL cannot be parsed or
//! the database file cannot be opened. This is intentional: the pool is
//! created once at startup and the process cannot do anything useful
//! without it.

use std::env;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Initializes the SQLite connection pool.
///
/// Foreign key enforcement is left at the sqlx default (on), which the
/// assignment table relies on for cascading deletes. The database file is
/// created on first start.
pub async fn init_db_pool() -> SqlitePool {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://fusebox.db".to_string());

    let options = SqliteConnectOptions::from_str(&database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to connect to database")
}
