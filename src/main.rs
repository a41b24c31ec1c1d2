//! gamelink broker
//!
//! Serves the command/admin surface and the confirmation intake as two
//! independent servers sharing only the persistent store.

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamelink::{
    routes, AppState, Config, IntakeState, RobloxResolver, SqliteStore, VerificationCoordinator,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamelink=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        port = config.port,
        intake_port = config.intake_port,
        database = %config.database_path,
        "Loaded configuration"
    );
    if config.admin_token.is_empty() {
        tracing::warn!("GAMELINK_ADMIN_TOKEN unset; admin surface is disabled");
    }
    if config.intake_token.is_empty() {
        tracing::warn!("GAMELINK_INTAKE_TOKEN unset; confirmation intake is disabled");
    }

    // Open the store; both surfaces share this handle
    let store = Arc::new(SqliteStore::open(&config.database_path)?);

    // Command/admin surface
    let resolver = RobloxResolver::new(config.resolver_base_url.clone());
    let coordinator =
        VerificationCoordinator::new(resolver, Arc::clone(&store), Arc::clone(&store));
    let command_app = routes::command_router(Arc::new(AppState::new(
        coordinator,
        config.admin_token.clone(),
    )));

    // Confirmation intake surface
    let intake_app = routes::intake_router(Arc::new(IntakeState::new(
        Arc::clone(&store),
        config.intake_token.clone(),
    )));

    let command_listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let intake_listener = TcpListener::bind(format!("0.0.0.0:{}", config.intake_port)).await?;
    tracing::info!("Command surface on http://0.0.0.0:{}", config.port);
    tracing::info!("Confirmation intake on http://0.0.0.0:{}", config.intake_port);

    tokio::try_join!(
        axum::serve(command_listener, command_app).into_future(),
        axum::serve(intake_listener, intake_app).into_future(),
    )?;

    Ok(())
}
