#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{create_test_agent, create_test_role, generate_unique_email, generate_unique_name,
    create_test_user, login, login_as, send};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_unlisted_action_is_forbidden(pool: PgPool) {
    let token = login_as(&pool, "coordinateur").await;
    let agent_id = create_test_agent(&pool).await;

    // coordinateur may view/create/edit agents but not delete them
    let (status, body) = send(
        &pool,
        "DELETE",
        &format!("/api/agents/{}", agent_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("delete"));

    let (status, _) = send(
        &pool,
        "GET",
        &format!("/api/agents/{}", agent_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_without_grants_is_denied_everywhere(pool: PgPool) {
    let role = generate_unique_name("vide");
    create_test_role(&pool, &role).await;
    let email = generate_unique_email();
    create_test_user(&pool, &email, &role).await;
    let token = login(&pool, &email).await;

    for uri in ["/api/agents", "/api/formations", "/api/sessions", "/api/stats"] {
        let (status, _) = send(&pool, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be denied", uri);
    }

    let (status, body) = send(&pool, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!({}));
    assert_eq!(body["ui_components"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_matrix_lists_every_role(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, body) = send(&pool, "GET", "/api/permissions", Some(&admin), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coordinateur"]["formateur"], json!(["view"]));
    assert_eq!(
        body["admin"]["agent"],
        json!(["view", "create", "edit", "delete"])
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_permissions_overwrites_and_applies_immediately(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let coordinateur = login_as(&pool, "coordinateur").await;
    let agent_id = create_test_agent(&pool).await;

    let (status, body) = send(
        &pool,
        "PUT",
        "/api/roles/coordinateur/permissions",
        Some(&admin),
        Some(json!({"permissions": {"agent": ["delete", "view", "view"]}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "coordinateur");
    // vocabulary order, duplicates removed, edit/create no longer granted
    assert_eq!(body["permissions"]["agent"], json!(["view", "delete"]));
    // other resources of the role are untouched
    assert_eq!(body["permissions"]["formateur"], json!(["view"]));

    let (status, _) = send(
        &pool,
        "PUT",
        &format!("/api/agents/{}", agent_id),
        Some(&coordinateur),
        Some(json!({"rank": "Lieutenant"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &pool,
        "DELETE",
        &format!("/api/agents/{}", agent_id),
        Some(&coordinateur),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_action_list_removes_the_grant(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, body) = send(
        &pool,
        "PUT",
        "/api/roles/coordinateur/permissions",
        Some(&admin),
        Some(json!({"permissions": {"formateur": []}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["permissions"]["formateur"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_action_is_rejected(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "PUT",
        "/api/roles/coordinateur/permissions",
        Some(&admin),
        Some(json!({"permissions": {"dashboard": ["view", "export"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // nothing was written
    let (_, body) = send(
        &pool,
        "GET",
        "/api/roles/coordinateur/permissions",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["permissions"]["dashboard"], json!(["view"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permissions_for_unknown_resource_or_role(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "PUT",
        "/api/roles/coordinateur/permissions",
        Some(&admin),
        Some(json!({"permissions": {"navire": ["view"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &pool,
        "PUT",
        "/api/roles/nobody/permissions",
        Some(&admin),
        Some(json!({"permissions": {"agent": ["view"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ui_permissions_are_independent(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let token = login_as(&pool, "user").await;

    let (status, body) = send(
        &pool,
        "PUT",
        "/api/roles/user/ui-permissions",
        Some(&admin),
        Some(json!({"components": {"agents.delete_button": true, "sessions.calendar": false}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["agents.delete_button"], true);
    assert_eq!(body["components"]["sessions.calendar"], false);

    let (_, me) = send(&pool, "GET", "/api/auth/me", Some(&token), None).await;
    let components = me["ui_components"].as_array().unwrap();
    assert!(components.contains(&json!("agents.delete_button")));
    assert!(!components.contains(&json!("sessions.calendar")));
    // the button is visible but the API still refuses
    assert!(me["permissions"]["agent"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ui_permissions_for_unknown_component(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "PUT",
        "/api/roles/user/ui-permissions",
        Some(&admin),
        Some(json!({"components": {"nowhere.button": true}})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
