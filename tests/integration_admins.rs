mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    assignment_count, assignment_count_for_role, create_test_user, create_user_with_role,
    grant_triple, permission_id_by_name, role_id_by_name, seed_defaults,
};
use fusebox::config::cors::CorsConfig;
use fusebox::config::jwt::JwtConfig;
use fusebox::config::seed::SeedConfig;
use fusebox::router::init_router;
use fusebox::state::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_test_app(pool: SqlitePool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        seed_config: SeedConfig::default(),
    };
    init_router(state)
}

async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse login response. Status: {}, Body: {:?}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    body["access_token"]
        .as_str()
        .unwrap_or_else(|| {
            panic!(
                "No access_token in response. Status: {}, Body: {}",
                status, body
            )
        })
        .to_string()
}

// ============ Gate Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_admins_requires_token(pool: SqlitePool) {
    seed_defaults(&pool).await;
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/admins")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admins_gate_requires_admin_panel(pool: SqlitePool) {
    seed_defaults(&pool).await;
    // Analyst defaults do not include admin_panel.
    create_user_with_role(&pool, "marie", "password123", "Analyst").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "marie", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "Access denied. Missing required permission: admin_panel"
    );
}

// ============ Create Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_create_admin_requires_super_admin(pool: SqlitePool) {
    seed_defaults(&pool).await;
    // Sub-Admin holds admin_panel, so the gate passes; creation still
    // requires the Super-Admin role.
    create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "todd", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "newadmin",
                "email": "newadmin@example.com",
                "password": "password123",
                "role": "Analyst"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Access denied. Required role: Super-Admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_admin_grants_role_defaults(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "todd",
                "email": "todd@example.com",
                "password": "password123",
                "full_name": "Todd Alquist",
                "role": "Sub-Admin"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admin: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(admin["username"], "todd");
    assert_eq!(admin["full_name"], "Todd Alquist");
    assert_eq!(admin["status"], "Active");
    assert_eq!(admin["roles"], json!(["Sub-Admin"]));

    // Sub-Admin defaults: home_dashboard, user_dashboard, admin_panel.
    let id = Uuid::parse_str(admin["id"].as_str().unwrap()).unwrap();
    let sub_admin = role_id_by_name(&pool, "Sub-Admin").await;
    assert_eq!(assignment_count_for_role(&pool, id, sub_admin).await, 3);

    // The new admin can log in with the supplied password.
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, "todd", "password123").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_admin_rejects_non_admin_role(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "hank",
                "email": "hank@example.com",
                "password": "password123",
                "role": "Inspector"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Role 'Inspector' is not an administrative role");

    // Nothing was created.
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind("hank")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_admin_duplicate_username(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    create_test_user(&pool, "todd", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "todd",
                "email": "other@example.com",
                "password": "password123",
                "role": "Analyst"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "A user with that username or email already exists");
}

// ============ List and Metrics Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_list_admins_excludes_non_tier_users(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;
    // Inspector is not an administrative role; huell holds nothing at all.
    create_user_with_role(&pool, "hank", "password123", "Inspector").await;
    create_test_user(&pool, "huell", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admins: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let usernames: Vec<&str> = admins
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["gus", "todd"]);
    assert_eq!(admins[0]["roles"], json!(["Super-Admin"]));
    assert_eq!(admins[1]["roles"], json!(["Sub-Admin"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_admins_role_filter(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    create_user_with_role(&pool, "skyler", "password123", "Analyst").await;
    create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins?role=Analyst")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admins: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(admins.as_array().unwrap().len(), 1);
    assert_eq!(admins[0]["username"], "skyler");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_admins_search_filter(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    create_user_with_role(&pool, "skyler", "password123", "Analyst").await;
    create_user_with_role(&pool, "walter", "password123", "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins?search=sky")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admins: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(admins.as_array().unwrap().len(), 1);
    assert_eq!(admins[0]["username"], "skyler");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_metrics(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;
    create_user_with_role(&pool, "skyler", "password123", "Analyst").await;
    let marie = create_user_with_role(&pool, "marie", "password123", "Analyst").await;
    // Off-tier users never show up in the counts.
    create_test_user(&pool, "huell", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins/metrics")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let metrics: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(metrics["total_admins"], 4);
    assert_eq!(metrics["active_admins"], 4);
    assert_eq!(metrics["sub_admins"], 1);
    assert_eq!(metrics["analysts"], 2);

    // Deactivating an analyst moves the active count only.
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admins/{}/status", marie.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admins/metrics")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let metrics: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(metrics["total_admins"], 4);
    assert_eq!(metrics["active_admins"], 3);
    assert_eq!(metrics["analysts"], 2);
}

// ============ Update and Status Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_status_flips(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    let todd = create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admins/{}/status", todd.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["id"], todd.id.to_string());
    assert_eq!(body["status"], "Inactive");

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admins/{}/status", todd.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "Active");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_status_unknown_admin(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admins/{}/status", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_admin_profile_fields(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    let todd = create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/admins/{}", todd.id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "full_name": "Todd Alquist" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admin: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(admin["full_name"], "Todd Alquist");
    assert_eq!(admin["email"], todd.email);
    // Role untouched when the payload does not name one.
    assert_eq!(admin["roles"], json!(["Sub-Admin"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_admin_role_change(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    let skyler = create_user_with_role(&pool, "skyler", "password123", "Analyst").await;
    let analyst = role_id_by_name(&pool, "Analyst").await;
    let sub_admin = role_id_by_name(&pool, "Sub-Admin").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/admins/{}", skyler.id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "role": "Sub-Admin" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let admin: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(admin["roles"], json!(["Sub-Admin"]));

    // Old tier role is gone, new one carries its full default set.
    assert_eq!(assignment_count_for_role(&pool, skyler.id, analyst).await, 0);
    assert_eq!(assignment_count_for_role(&pool, skyler.id, sub_admin).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_admin_role_change_keeps_non_tier_roles(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    let skyler = create_user_with_role(&pool, "skyler", "password123", "Analyst").await;
    let inspector = role_id_by_name(&pool, "Inspector").await;
    let home = permission_id_by_name(&pool, "home_dashboard").await;
    grant_triple(&pool, skyler.id, inspector, home).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/admins/{}", skyler.id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "role": "Sub-Admin" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Swapping the administrative role does not touch other roles.
    assert_eq!(assignment_count_for_role(&pool, skyler.id, inspector).await, 1);
}

// ============ Delete Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_admin_removes_assignments(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    let todd = create_user_with_role(&pool, "todd", "password123", "Sub-Admin").await;
    assert_eq!(assignment_count(&pool, todd.id).await, 3);

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/admins/{}", todd.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(todd.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
    // Assignment rows go with the user.
    assert_eq!(assignment_count(&pool, todd.id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_non_tier_user_not_found(pool: SqlitePool) {
    seed_defaults(&pool).await;
    create_user_with_role(&pool, "gus", "password123", "Super-Admin").await;
    // Exists, but holds no administrative role.
    let huell = create_test_user(&pool, "huell", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "gus", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/admins/{}", huell.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Admin user not found");

    // The user row is untouched.
    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(huell.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}
