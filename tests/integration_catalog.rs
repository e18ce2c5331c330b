#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{create_test_formation, login_as, send};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_agent_crud(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, agent) = send(
        &pool,
        "POST",
        "/api/agents",
        Some(&admin),
        Some(json!({
            "matricule": "MAR-2025-0042",
            "first_name": "Maëlle",
            "last_name": "Kerjean",
            "email": "m.kerjean@test.com",
            "birth_date": "1994-07-21T00:00:00+02:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(agent["birth_date"], "1994-07-21");
    let id = agent["id"].as_str().unwrap();

    let (status, agent) = send(
        &pool,
        "PUT",
        &format!("/api/agents/{}", id),
        Some(&admin),
        Some(json!({"rank": "Lieutenant"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["rank"], "Lieutenant");
    assert_eq!(agent["first_name"], "Maëlle");

    let (status, _) = send(&pool, "DELETE", &format!("/api/agents/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&pool, "GET", &format!("/api/agents/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_matricule_is_conflict(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let payload = json!({"matricule": "MAR-1", "first_name": "Yann", "last_name": "Le Goff"});

    let (status, _) = send(&pool, "POST", "/api/agents", Some(&admin), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&pool, "POST", "/api/agents", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "An agent with this matricule or email already exists"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_agent_search_and_pagination(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    for (matricule, last_name) in [("A-1", "Le Goff"), ("A-2", "Le Bihan"), ("A-3", "Morvan")] {
        let (status, _) = send(
            &pool,
            "POST",
            "/api/agents",
            Some(&admin),
            Some(json!({"matricule": matricule, "first_name": "Test", "last_name": last_name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &pool,
        "GET",
        "/api/agents?search=le%20&limit=1",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["limit"], 1);
    assert_eq!(body["meta"]["has_more"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_formation_validation_and_conflict(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, _) = send(
        &pool,
        "POST",
        "/api/formations",
        Some(&admin),
        Some(json!({"code": "STCW-BST", "title": "Sécurité de base", "duration_days": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payload = json!({"code": "STCW-BST", "title": "Sécurité de base", "duration_days": 5});
    let (status, _) = send(&pool, "POST", "/api/formations", Some(&admin), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&pool, "POST", "/api/formations", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cours_formateur_assignment(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;
    let formation_id = create_test_formation(&pool).await;

    let (status, cours) = send(
        &pool,
        "POST",
        "/api/cours",
        Some(&admin),
        Some(json!({
            "code": "NAV-101",
            "title": "Radar",
            "duration_hours": 12,
            "formation_id": formation_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cours_id = cours["id"].as_str().unwrap();

    let (status, formateur) = send(
        &pool,
        "POST",
        "/api/formateurs",
        Some(&admin),
        Some(json!({
            "first_name": "Erwan",
            "last_name": "Tanguy",
            "email": "e.tanguy@test.com",
            "specialty": "Navigation"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let formateur_id = formateur["id"].as_str().unwrap();

    let uri = format!("/api/cours/{}/formateurs", cours_id);
    let body = json!({"formateur_id": formateur_id});

    let (status, assignment) = send(&pool, "POST", &uri, Some(&admin), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["last_name"], "Tanguy");

    let (status, _) = send(&pool, "POST", &uri, Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, taught) = send(
        &pool,
        "GET",
        &format!("/api/formateurs/{}/cours", formateur_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(taught[0]["code"], "NAV-101");

    let (status, _) = send(
        &pool,
        "DELETE",
        &format!("{}/{}", uri, formateur_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &pool,
        "DELETE",
        &format!("{}/{}", uri, formateur_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_page_far_past_the_end_is_empty(pool: PgPool) {
    let admin = login_as(&pool, "admin").await;

    let (status, body) = send(
        &pool,
        "GET",
        "/api/agents?page=9223372036854775807&limit=20",
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["has_more"], false);
}
