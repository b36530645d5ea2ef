use sqlx::SqlitePool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::seed::SeedConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub seed_config: SeedConfig,
}

/// Builds the shared application state and brings the schema up to date.
///
/// Migrations are embedded in the binary, so a fresh database file is fully
/// usable after this returns.
pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        seed_config: SeedConfig::from_env(),
    }
}
