/// HRM Auth Service - Main entry point
use actix_middleware::RequestLogging;
use actix_web::{App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crypto_core::{SecretStrength, TokenCodec};
use hrm_auth_service::{db::PgUserRepository, routes, telemetry, AppState, Config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration from environment")?;

    telemetry::init_tracing(config.log_format)?;
    tracing::info!(?config, "Starting HRM Auth Service");

    if config.secret_strength() == SecretStrength::Acceptable {
        tracing::warn!("JWT_SECRET is shorter than recommended; use 64+ random bytes");
    }

    // Initialize database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database connection pool initialized");

    let codec = Arc::new(TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.jwt_ttl_secs,
    ));
    let state = AppState::new(Arc::new(PgUserRepository::new(pool)), codec);

    let bind_address = config.bind_address();
    tracing::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(RequestLogging)
            .configure(move |cfg| routes::configure(cfg, state))
    })
    .bind(bind_address)
    .context("Failed to bind HTTP listener")?
    .run()
    .await?;

    tracing::info!("HRM Auth Service stopped");
    Ok(())
}
