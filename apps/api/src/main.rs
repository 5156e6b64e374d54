//! Rolegate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use rolegate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool =
        api_services::connect_and_migrate(&config.database_url, config.database_max_connections)
            .await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    if config.seed_default_roles {
        rolegate_infrastructure::ensure_default_roles(&pool).await?;
    }

    let app_state = api_services::build_app_state(pool, config.identity_header.clone());
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rolegate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
