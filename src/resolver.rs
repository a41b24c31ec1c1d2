//! External account resolution
//!
//! Resolves a claimed game-platform username to a stable account id
//! via the platform's username-lookup API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::store::{ExternalAccount, ExternalId};

/// Resolution failure, kept distinct so callers can tell a bad
/// username from an unreachable upstream.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No account with that username")]
    NotFound,

    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

/// Trait for resolving usernames to external accounts
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Resolve a free-text username to an account. Queries live state;
    /// no caching, no side effects.
    async fn resolve(&self, username: &str) -> Result<ExternalAccount, ResolveError>;
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
struct LookupEntry {
    id: u64,
    #[serde(default)]
    name: Option<String>,
}

/// Extract the first matched account from a lookup response.
/// Empty/missing `data` means the username does not exist.
fn parse_lookup(requested: &str, response: LookupResponse) -> Option<ExternalAccount> {
    response.data.into_iter().next().map(|entry| ExternalAccount {
        id: ExternalId(entry.id),
        username: entry.name.unwrap_or_else(|| requested.to_string()),
    })
}

/// Resolver backed by the Roblox users API
pub struct RobloxResolver {
    client: reqwest::Client,
    base_url: String,
}

impl RobloxResolver {
    /// Create a resolver against the given API base URL
    /// (`https://users.roblox.com` in production)
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }
}

#[async_trait]
impl AccountResolver for RobloxResolver {
    async fn resolve(&self, username: &str) -> Result<ExternalAccount, ResolveError> {
        let url = format!("{}/v1/usernames/users", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "usernames": [username],
                "excludeBannedUsers": true,
            }))
            .send()
            .await
            .map_err(|e| ResolveError::Unavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ResolveError::Unavailable(format!(
                "Lookup returned {}",
                response.status()
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Unavailable(format!("Invalid JSON: {}", e)))?;

        parse_lookup(username, body).ok_or(ResolveError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_takes_first_match() {
        let response: LookupResponse = serde_json::from_value(json!({
            "data": [
                { "requestedUsername": "builderman", "id": 42, "name": "Builderman" },
                { "requestedUsername": "other", "id": 7, "name": "Other" }
            ]
        }))
        .unwrap();

        let account = parse_lookup("builderman", response).unwrap();
        assert_eq!(account.id, ExternalId(42));
        assert_eq!(account.username, "Builderman");
    }

    #[test]
    fn test_parse_lookup_empty_data_is_not_found() {
        let response: LookupResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(parse_lookup("nobody", response).is_none());
    }

    #[test]
    fn test_parse_lookup_missing_data_is_not_found() {
        let response: LookupResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parse_lookup("nobody", response).is_none());
    }

    #[test]
    fn test_parse_lookup_falls_back_to_requested_name() {
        let response: LookupResponse = serde_json::from_value(json!({
            "data": [ { "id": 42 } ]
        }))
        .unwrap();

        let account = parse_lookup("Builderman", response).unwrap();
        assert_eq!(account.username, "Builderman");
    }
}
