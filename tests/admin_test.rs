//! Tests for the admin surface and its authorization gate

mod common;

use common::{create_test_broker, link_user, StubResolver, ADMIN_TOKEN};
use serde_json::{json, Value};

#[tokio::test]
async fn test_admin_requires_token() {
    let broker = create_test_broker(StubResolver::with_accounts(&[("Builderman", 42)]));
    link_user(&broker, "u1", "Builderman", 42).await;

    // Missing token
    let response = broker
        .command
        .get("/api/admin/lookup")
        .add_query_param("username", "Builderman")
        .await;
    assert_eq!(response.status_code(), 403);

    // Wrong token
    let response = broker
        .command
        .get("/api/admin/lookup")
        .authorization_bearer("wrong")
        .add_query_param("username", "Builderman")
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_unauthorized_unlink_mutates_nothing() {
    let broker = create_test_broker(StubResolver::with_accounts(&[("Builderman", 42)]));
    link_user(&broker, "u1", "Builderman", 42).await;

    let response = broker
        .command
        .post("/api/admin/unlink")
        .json(&json!({ "local_id": "u1" }))
        .await;
    assert_eq!(response.status_code(), 403);

    // The link survived
    let response = broker
        .command
        .get("/api/status")
        .add_query_param("local_id", "u1")
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "linked");
}

#[tokio::test]
async fn test_lookup_by_username_exact_match() {
    let broker = create_test_broker(StubResolver::with_accounts(&[("Builderman", 42)]));
    link_user(&broker, "u1", "Builderman", 42).await;

    let response = broker
        .command
        .get("/api/admin/lookup")
        .authorization_bearer(ADMIN_TOKEN)
        .add_query_param("username", "Builderman")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["local_id"], "u1");
    assert_eq!(body["external_id"], 42);

    // Different case misses: exact match is the documented contract
    let response = broker
        .command
        .get("/api/admin/lookup")
        .authorization_bearer(ADMIN_TOKEN)
        .add_query_param("username", "builderman")
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_unlink_reports_noop_distinctly() {
    let broker = create_test_broker(StubResolver::with_accounts(&[("Builderman", 42)]));
    link_user(&broker, "u1", "Builderman", 42).await;

    let response = broker
        .command
        .post("/api/admin/unlink")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "local_id": "u1" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["deleted"], true);

    // Second unlink is a no-op, not an error
    let response = broker
        .command
        .post("/api/admin/unlink")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "local_id": "u1" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["deleted"], false);

    // And the lookup now misses
    let response = broker
        .command
        .get("/api/admin/lookup")
        .authorization_bearer(ADMIN_TOKEN)
        .add_query_param("username", "Builderman")
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_list_links() {
    let broker = create_test_broker(StubResolver::with_accounts(&[
        ("Builderman", 42),
        ("Telamon", 99),
    ]));
    link_user(&broker, "u1", "Builderman", 42).await;
    link_user(&broker, "u2", "Telamon", 99).await;

    let response = broker
        .command
        .get("/api/admin/links")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert!(links
        .iter()
        .any(|l| l["local_id"] == "u1" && l["external_username"] == "Builderman"));
    assert!(links
        .iter()
        .any(|l| l["local_id"] == "u2" && l["external_username"] == "Telamon"));
}
