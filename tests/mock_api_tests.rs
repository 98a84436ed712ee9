//! Routing tests of the mock API through axum-test
//!
//! These tests verify that:
//! - Route segments resolve through the registry
//! - Status codes and error bodies follow the REST contract
//! - Validation runs on create (full) and update (partial)

use axum::http::StatusCode;
use axum_test::TestServer;
use this_admin::prelude::*;

fn server() -> TestServer {
    TestServer::try_new(this_admin::server::router(MockApiState::default()))
        .expect("Failed to create test server")
}

async fn create_player(server: &TestServer) -> Value {
    let response = server
        .post("/players")
        .json(&json!({"user_id": "u1", "coach_id": null}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_create_returns_201_with_id() {
    let server = server();
    let created = create_player(&server).await;

    assert!(created["id"].is_string());
    assert_eq!(created["user_id"], json!("u1"));
    assert!(created["created_at"].is_string());
}

#[tokio::test]
async fn test_create_validation_failure_is_422_with_fields() {
    let server = server();
    let response = server
        .post("/player-profiles")
        .json(&json!({"notes": 42}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));

    let fields = body["details"]["fields"].as_array().unwrap();
    let names: Vec<&str> = fields.iter().filter_map(|f| f["field"].as_str()).collect();
    assert_eq!(names, vec!["notes", "player_id"]);
    assert_eq!(fields[0]["kind"], json!("type_mismatch"));
    assert_eq!(fields[1]["kind"], json!("missing_field"));
}

#[tokio::test]
async fn test_update_validates_only_present_fields() {
    let server = server();
    let id = create_player(&server).await["id"].as_str().unwrap().to_string();

    let response = server
        .put(&format!("/players/{}", id))
        .json(&json!({"parent_id": "u7"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["user_id"], json!("u1"));

    let response = server
        .put(&format!("/players/{}", id))
        .json(&json!({"user_id": null}))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_of_missing_record_is_404_before_validation() {
    let server = server();
    let response = server
        .put("/players/missing")
        .json(&json!({"user_id": null}))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], json!("ENTITY_NOT_FOUND"));
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let server = server();
    let id = create_player(&server).await["id"].as_str().unwrap().to_string();

    server
        .delete(&format!("/players/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = server.get(&format!("/players/{}", id)).await;
    response.assert_status_not_found();
    let body = response.json::<Value>();
    assert_eq!(body["code"], json!("ENTITY_NOT_FOUND"));
    assert_eq!(body["details"]["id"], json!(id));

    server
        .delete(&format!("/players/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_list_with_repeated_relation_params() {
    let server = server();
    let user = server
        .post("/users")
        .json(&json!({"email": "coach@academy.org", "roq_user_id": "r1", "tenant_id": "t1"}))
        .await
        .json::<Value>();
    let user_id = user["id"].as_str().unwrap();

    server
        .post("/players")
        .json(&json!({"user_id": "u1", "coach_id": user_id}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/players")
        .add_query_param("relation", "user_player_coach_idTouser")
        .add_query_param("relation", "player_profile.count")
        .await;
    response.assert_status_ok();

    let players = response.json::<Vec<Value>>();
    assert_eq!(players.len(), 1);
    assert_eq!(
        players[0]["user_player_coach_idTouser"]["email"],
        json!("coach@academy.org")
    );
    assert_eq!(players[0]["_count"]["player_profile"], json!(0));
}

#[tokio::test]
async fn test_custom_registry_routes() {
    let mut registry = EntityRegistry::builtin().clone();
    registry.register(EntityDescriptor::new("squad", "player"));
    let state = MockApiState::new(
        InMemoryStore::with_builtin_relations(),
        registry,
        this_admin::entities::schema_validator(),
    );
    let server = TestServer::try_new(this_admin::server::router(state)).unwrap();

    server
        .post("/squad")
        .json(&json!({"user_id": "u1"}))
        .await
        .assert_status(StatusCode::CREATED);
    let players = server.get("/players").await.json::<Vec<Value>>();
    assert_eq!(players.len(), 1);
}

#[tokio::test]
async fn test_bearer_token_is_checked() {
    let state = MockApiState::default().with_token("s3cret");
    let server = TestServer::try_new(this_admin::server::router(state)).unwrap();

    let response = server.get("/academies").await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["code"], json!("ACCESS_DENIED"));

    server
        .get("/academies")
        .authorization_bearer("s3cret")
        .await
        .assert_status_ok();
}
