use chrono::Utc;
use fusebox::config::seed::SeedConfig;
use fusebox::modules::rbac::seed;
use fusebox::utils::password::hash_password;
use sqlx::SqlitePool;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Apply the built-in role and permission table, as server startup does.
pub async fn seed_defaults(pool: &SqlitePool) {
    seed::initialize(pool, &SeedConfig::default())
        .await
        .expect("Failed to seed roles and permissions");
}

/// Insert a user row directly. The user starts with no assignments.
pub async fn create_test_user(pool: &SqlitePool, username: &str, password: &str) -> TestUser {
    let hashed = hash_password(password).unwrap();
    let id = Uuid::new_v4();
    let email = format!("{}@example.com", username);

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(&email)
    .bind(hashed)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        email,
        password: password.to_string(),
    }
}

/// Insert a user holding the given seeded role with its full default
/// permission set, mirroring what admin creation grants.
#[allow(dead_code)]
pub async fn create_user_with_role(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: &str,
) -> TestUser {
    let user = create_test_user(pool, username, password).await;
    let role_id = role_id_by_name(pool, role).await;

    let config = SeedConfig::default();
    let defaults = config
        .role_defaults(role)
        .unwrap_or_else(|| panic!("No seed defaults for role {}", role));
    for permission in defaults {
        let permission_id = permission_id_by_name(pool, permission).await;
        grant_triple(pool, user.id, role_id, permission_id).await;
    }

    user
}

/// Record a single `(user, role, permission)` assignment row.
#[allow(dead_code)]
pub async fn grant_triple(pool: &SqlitePool, user_id: Uuid, role_id: Uuid, permission_id: Uuid) {
    sqlx::query(
        "INSERT INTO assignments (id, user_id, role_id, permission_id, created_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id, role_id, permission_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role_id)
    .bind(permission_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

#[allow(dead_code)]
pub async fn role_id_by_name(pool: &SqlitePool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("Role {} not found: {}", name, e))
}

#[allow(dead_code)]
pub async fn permission_id_by_name(pool: &SqlitePool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM permissions WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("Permission {} not found: {}", name, e))
}

/// Total assignment rows for a user across all roles.
#[allow(dead_code)]
pub async fn assignment_count(pool: &SqlitePool, user_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Assignment rows for a user under one role.
#[allow(dead_code)]
pub async fn assignment_count_for_role(pool: &SqlitePool, user_id: Uuid, role_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM assignments WHERE user_id = ? AND role_id = ?",
    )
    .bind(user_id)
    .bind(role_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().to_string()[..8])
}
