//! Common test utilities for broker integration tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use gamelink::store::{ExternalAccount, ExternalId};
use gamelink::{
    routes, AccountResolver, AppState, InMemoryLinkStore, InMemoryVerificationStore, IntakeState,
    ResolveError, VerificationCoordinator,
};

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const INTAKE_TOKEN: &str = "oracle-secret";

/// Resolver backed by a fixed username directory
pub struct StubResolver {
    accounts: HashMap<String, u64>,
    unavailable: bool,
}

impl StubResolver {
    pub fn with_accounts(entries: &[(&str, u64)]) -> Self {
        Self {
            accounts: entries
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
            unavailable: false,
        }
    }

    pub fn down() -> Self {
        Self {
            accounts: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl AccountResolver for StubResolver {
    async fn resolve(&self, username: &str) -> Result<ExternalAccount, ResolveError> {
        if self.unavailable {
            return Err(ResolveError::Unavailable("stub offline".to_string()));
        }
        self.accounts
            .get(username)
            .map(|id| ExternalAccount {
                id: ExternalId(*id),
                username: username.to_string(),
            })
            .ok_or(ResolveError::NotFound)
    }
}

/// The two surfaces of a broker under test, sharing stores the way the
/// real binary shares its SQLite handle
pub struct TestBroker {
    pub command: TestServer,
    pub intake: TestServer,
}

pub fn create_test_broker(resolver: StubResolver) -> TestBroker {
    let links = Arc::new(InMemoryLinkStore::new());
    let verifications = Arc::new(InMemoryVerificationStore::new());

    let coordinator =
        VerificationCoordinator::new(resolver, Arc::clone(&links), Arc::clone(&verifications));
    let command_app = routes::command_router(Arc::new(AppState::new(
        coordinator,
        ADMIN_TOKEN.to_string(),
    )));

    let intake_app = routes::intake_router(Arc::new(IntakeState::new(
        Arc::clone(&verifications),
        INTAKE_TOKEN.to_string(),
    )));

    TestBroker {
        command: TestServer::new(command_app).expect("Failed to create command test server"),
        intake: TestServer::new(intake_app).expect("Failed to create intake test server"),
    }
}

/// Drive a user all the way to linked
pub async fn link_user(broker: &TestBroker, local_id: &str, username: &str, external_id: u64) {
    let response = broker
        .command
        .post("/api/request_verification")
        .json(&serde_json::json!({ "local_id": local_id, "username": username }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = broker
        .intake
        .post("/intake/confirmation")
        .authorization_bearer(INTAKE_TOKEN)
        .json(&serde_json::json!({
            "local_id": local_id,
            "external_id": external_id,
            "external_username": username,
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = broker
        .command
        .post("/api/complete_verification")
        .json(&serde_json::json!({ "local_id": local_id }))
        .await;
    assert_eq!(response.status_code(), 200);
}
