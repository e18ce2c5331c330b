#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{generate_unique_name, login_as, send};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_get_resource(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let name = generate_unique_name("certificat");

    let (status, body) = send(
        &pool,
        "POST",
        "/api/resources",
        Some(&admin),
        Some(json!({
            "name": name,
            "display_name": "Certificats",
            "actions": ["view", "issue", "revoke"],
            "action_labels": {"issue": "Délivrer"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["actions"], json!(["view", "issue", "revoke"]));
    assert_eq!(body["action_labels"], json!({"issue": "Délivrer"}));

    let (status, body) = send(
        &pool,
        "GET",
        &format!("/api/resources/{}", name),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Certificats");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_resource_is_conflict(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, body) = send(
        &pool,
        "POST",
        "/api/resources",
        Some(&admin),
        Some(json!({
            "name": "agent",
            "display_name": "Agents bis",
            "actions": ["view"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Resource 'agent' already exists");

    // the original is untouched
    let (_, body) = send(&pool, "GET", "/api/resources/agent", Some(&admin), None).await;
    assert_eq!(body["display_name"], "Agents");
    assert_eq!(body["actions"], json!(["view", "create", "edit", "delete"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_resource_validation(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let cases = [
        json!({"name": "navire", "display_name": "Navires", "actions": []}),
        json!({"name": "navire", "display_name": "Navires", "actions": ["view", "view"]}),
        json!({"name": "Navire", "display_name": "Navires", "actions": ["view"]}),
        json!({
            "name": "navire",
            "display_name": "Navires",
            "actions": ["view"],
            "action_labels": {"delete": "Supprimer"}
        }),
    ];

    for payload in cases {
        let (status, _) = send(
            &pool,
            "POST",
            "/api/resources",
            Some(&admin),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", payload);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_removing_an_action_prunes_grants(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, body) = send(
        &pool,
        "PUT",
        "/api/resources/session",
        Some(&admin),
        Some(json!({"actions": ["view", "create", "edit"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actions"], json!(["view", "create", "edit"]));
    assert!(body["action_labels"]["delete"].is_null());
    assert_eq!(body["action_labels"]["create"], "Planifier");

    let (_, matrix) = send(&pool, "GET", "/api/permissions", Some(&admin), None).await;
    assert_eq!(
        matrix["coordinateur"]["session"],
        json!(["view", "create", "edit"])
    );
    assert_eq!(matrix["admin"]["session"], json!(["view", "create", "edit"]));
    // grants that were already inside the vocabulary keep their order
    assert_eq!(matrix["formateur"]["session"], json!(["view", "edit"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_labels_must_match_vocabulary(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "PUT",
        "/api/resources/dashboard",
        Some(&admin),
        Some(json!({"action_labels": {"export": "Exporter"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &pool,
        "PUT",
        "/api/resources/dashboard",
        Some(&admin),
        Some(json!({
            "actions": ["view", "export"],
            "action_labels": {"view": "Voir", "export": "Exporter"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action_labels"]["export"], "Exporter");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_resource_cascades_to_grants(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "DELETE",
        "/api/resources/dashboard",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, matrix) = send(&pool, "GET", "/api/permissions", Some(&admin), None).await;
    assert!(matrix["user"]["dashboard"].is_null());

    let (status, _) = send(
        &pool,
        "DELETE",
        "/api/resources/dashboard",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
