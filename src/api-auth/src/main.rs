use std::sync::Arc;

use anyhow::Context;
use core_auth::{get_api_base_url, get_app_config, get_db_pool, setup_logging};
use data_model_auth::migrations::run_migrations;
use data_model_auth::store::PgUserStore;

use api_auth::routes;
use api_auth::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    setup_logging("api_auth=debug,data_model_auth=debug,tower_http=debug");

    let config = get_app_config().context("Invalid configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let pool = get_db_pool().await?;
    run_migrations(&pool).await.context("Failed to create database schema")?;

    let state = AppState::new(Arc::new(PgUserStore::new(pool)), &config)?;
    let app = routes::router().with_state(state);

    let addr = get_api_base_url().context("Invalid HOST or PORT")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
