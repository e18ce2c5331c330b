#![cfg(feature = "db-tests")]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    TEST_PASSWORD, create_test_user, generate_unique_email, login, login_as, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_sets_session_cookie(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "coordinateur").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": email, "password": TEST_PASSWORD}).to_string(),
        ))
        .unwrap();

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("helmsman_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login_at FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cookie_authenticates_like_bearer(pool: PgPool) {
    let token = login_as(&pool, "coordinateur").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("helmsman_session={}", token))
        .body(Body::empty())
        .unwrap();

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_wrong_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "user").await;

    let (status, body) = send(
        &pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "not-the-password"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_unknown_email(pool: PgPool) {
    let (status, body) = send(
        &pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": generate_unique_email(), "password": TEST_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_returns_role_grants_and_components(pool: PgPool) {
    let token = login_as(&pool, "user").await;

    let (status, body) = send(&pool, "GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["role"]["name"], "user");
    assert_eq!(body["permissions"]["formation"], json!(["view"]));
    assert!(body["permissions"]["agent"].is_null());
    assert_eq!(
        body["ui_components"],
        json!(["sessions.calendar", "sidebar.formations", "sidebar.sessions"])
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_banned_user_cannot_log_in(pool: PgPool) {
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "user").await;
    sqlx::query("UPDATE users SET banned = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(
        &pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": TEST_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ban_takes_effect_on_existing_session(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "coordinateur").await;
    let token = login(&pool, &email).await;

    let (status, _) = send(&pool, "GET", "/api/agents", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &pool,
        "POST",
        &format!("/api/users/{}/ban", user_id),
        Some(&admin),
        Some(json!({"reason": "left the school"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["banned"], true);

    let (status, _) = send(&pool, "GET", "/api/agents", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_change_applies_to_next_request(pool: PgPool) {
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "user").await;
    let token = login(&pool, &email).await;

    let (status, _) = send(&pool, "GET", "/api/agents", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    sqlx::query("UPDATE users SET role = 'coordinateur' WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(&pool, "GET", "/api/agents", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_ban_themselves(pool: PgPool) {
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, &email, "admin").await;
    let token = login(&pool, &email).await;

    let (status, _) = send(
        &pool,
        "POST",
        &format!("/api/users/{}/ban", user_id),
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
