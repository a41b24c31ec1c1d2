//! Broker configuration

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the command/admin surface
    pub port: u16,

    /// Port for the confirmation intake surface
    pub intake_port: u16,

    /// Path to the SQLite database
    pub database_path: String,

    /// Bearer token required for admin operations.
    /// Unset means every admin request is rejected.
    pub admin_token: String,

    /// Bearer token the confirmation oracle must present.
    /// Unset means every intake request is rejected.
    pub intake_token: String,

    /// Base URL of the game platform's users API
    pub resolver_base_url: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    /// suitable for local development
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("GAMELINK_PORT", 3000),
            intake_port: env_parsed("GAMELINK_INTAKE_PORT", 3001),
            database_path: env_string("GAMELINK_DB", "links.db"),
            admin_token: env_string("GAMELINK_ADMIN_TOKEN", ""),
            intake_token: env_string("GAMELINK_INTAKE_TOKEN", ""),
            resolver_base_url: env_string("GAMELINK_USERS_API", "https://users.roblox.com"),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
