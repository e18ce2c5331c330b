#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use helmsman::helmsman_config::{CorsConfig, JwtConfig, SessionConfig};
use helmsman::helmsman_core::hash_password;
use helmsman::router::init_router;
use helmsman::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            session_expiry_days: 7,
        },
        session_config: SessionConfig::default(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    };
    init_router(state, None)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Inserts a user holding `role` and returns its id.
pub async fn create_test_user(pool: &PgPool, email: &str, role: &str) -> Uuid {
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    sqlx::query_scalar(
        r#"INSERT INTO users (email, name, role, password_hash)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(email)
    .bind("Test User")
    .bind(role)
    .bind(hashed)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_role(pool: &PgPool, name: &str) {
    sqlx::query("INSERT INTO roles (name, display_name) VALUES ($1, $2)")
        .bind(name)
        .bind("Test Role")
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_formation(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO formations (code, title, duration_days)
           VALUES ($1, 'Survie en mer', 3)
           RETURNING id"#,
    )
    .bind(format!("FRM-{}", &Uuid::new_v4().simple().to_string()[..8]))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_agent(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO agents (matricule, first_name, last_name)
           VALUES ($1, 'Yann', 'Le Goff')
           RETURNING id"#,
    )
    .bind(format!("AG-{}", &Uuid::new_v4().simple().to_string()[..12]))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Logs in through the API and returns the session token.
pub async fn login(pool: &PgPool, email: &str) -> String {
    let (status, body) = send(
        pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": TEST_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"]
        .as_str()
        .unwrap_or_else(|| panic!("No token in response: {}", body))
        .to_string()
}

/// Creates a user with `role` and logs them in.
pub async fn login_as(pool: &PgPool, role: &str) -> String {
    let email = generate_unique_email();
    create_test_user(pool, &email, role).await;
    login(pool, &email).await
}

/// Sends one request to a fresh router. Empty bodies come back as `Value::Null`.
pub async fn send(
    pool: &PgPool,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = setup_test_app(pool.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
