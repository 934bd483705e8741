use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatekeeper::{
  domain::auth::services::{AuthService, AuthServiceConfig},
  infrastructure::{
    config::{Config, DatabaseConfig},
    persistence::postgres::PostgresUserRepository,
    security::{Argon2PasswordHasher, RandomTokenIssuer},
  },
};

async fn connect(config: &DatabaseConfig, url: &str) -> anyhow::Result<PgPool> {
  tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
      .connect(url),
  )
  .await
  .with_context(|| {
    format!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.connect_timeout_seconds
    )
  })?
  .context("Failed to connect to database")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gatekeeper=debug,sqlx=warn".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting gatekeeper");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let writer = connect(&config.database, &config.database.url).await?;
  let reader = match config.database.read_url.as_deref() {
    Some(read_url) => {
      tracing::info!("Connecting to read replica");
      connect(&config.database, read_url).await?
    }
    None => writer.clone(),
  };
  tracing::info!("Database connection pools created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&writer)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  let hashing = &config.security.hashing;
  if !hashing.is_production_grade() {
    tracing::warn!(
      memory_kib = hashing.memory_kib,
      iterations = hashing.iterations,
      "Password hashing work factor is below the recommended minimum"
    );
  }
  let password_hasher =
    Argon2PasswordHasher::new(hashing).context("Invalid password hashing parameters")?;

  // The transport layer that drives this service is wired outside this crate.
  let _auth_service = AuthService::new(
    Arc::new(PostgresUserRepository::with_pools(writer.clone(), reader.clone())),
    Arc::new(password_hasher),
    Arc::new(RandomTokenIssuer::new()),
    AuthServiceConfig::from(&config.auth),
  );

  tracing::info!(
    store_timeout_millis = config.auth.store_timeout_millis,
    "Authentication service ready"
  );

  reader.close().await;
  writer.close().await;

  Ok(())
}
