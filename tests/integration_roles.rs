#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{
    create_test_role, create_test_user, generate_unique_email, generate_unique_name, login,
    login_as, send,
};
use serde_json::json;
use sqlx::PgPool;

async fn role_of(pool: &PgPool, user_id: uuid::Uuid) -> String {
    sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_roles_with_user_counts(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    create_test_user(&pool, &generate_unique_email(), "coordinateur").await;
    create_test_user(&pool, &generate_unique_email(), "coordinateur").await;

    let (status, body) = send(&pool, "GET", "/api/roles", Some(&admin), None).await;

    assert_eq!(status, StatusCode::OK);
    let roles = body.as_array().unwrap();
    let coordinateur = roles.iter().find(|r| r["name"] == "coordinateur").unwrap();
    assert_eq!(coordinateur["user_count"], 2);
    assert!(roles.iter().any(|r| r["name"] == "admin" && r["is_system"] == true));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_role_conflict(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let name = generate_unique_name("auditeur");
    let payload = json!({"name": name, "display_name": "Auditeur"});

    let (status, body) = send(&pool, "POST", "/api/roles", Some(&admin), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_system"], false);

    let (status, _) = send(&pool, "POST", "/api/roles", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_role_rejects_bad_name(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "POST",
        "/api/roles",
        Some(&admin),
        Some(json!({"name": "Chef Mécanicien", "display_name": "Chef"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_role_reassigns_users(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let name = generate_unique_name("temp");
    create_test_role(&pool, &name).await;

    let first = create_test_user(&pool, &generate_unique_email(), &name).await;
    let second = create_test_user(&pool, &generate_unique_email(), &name).await;

    let (status, body) = send(
        &pool,
        "DELETE",
        &format!("/api/roles/{}", name),
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], name.as_str());
    assert_eq!(body["reassigned_users"], 2);
    assert_eq!(role_of(&pool, first).await, "user");
    assert_eq!(role_of(&pool, second).await, "user");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles WHERE name = $1")
        .bind(&name)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_role_drops_its_permissions(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "DELETE",
        "/api/roles/coordinateur",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let grants: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM role_permissions rp JOIN roles r ON r.id = rp.role_id WHERE r.name = 'coordinateur'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(grants, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_system_roles_cannot_be_deleted(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    for name in ["admin", "user"] {
        let (status, _) = send(
            &pool,
            "DELETE",
            &format!("/api/roles/{}", name),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {} was deleted", name);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_role(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "DELETE",
        "/api/roles/does_not_exist",
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_endpoints_are_guarded(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "coordinateur").await;
    let token = login(&pool, &email).await;

    let (status, _) = send(&pool, "GET", "/api/roles", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &pool,
        "DELETE",
        "/api/roles/formateur",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
