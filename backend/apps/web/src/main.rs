//! Web Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors go through `users::UsersError` / `kernel::error::AppError`.

mod app;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::domain::repository::SessionRepository;
use users::{InMemoryUsersRepository, PgUsersRepository, UsersConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,users=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    let app = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            // Startup cleanup: remove expired sessions
            // Errors here should not prevent server startup
            let store = PgUsersRepository::new(pool);
            if let Err(e) = store.cleanup_expired().await {
                tracing::warn!(
                    error = %e,
                    "User session cleanup failed, continuing anyway"
                );
            }

            app::build_app(store, config)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, users and sessions are kept in memory only");
            app::build_app(InMemoryUsersRepository::new(), config)
        }
    };

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Cookie secret from `COOKIE_SECRET` (base64, 32 bytes)
///
/// Debug builds fall back to a random secret, so sessions do not survive a
/// restart there.
fn load_config() -> anyhow::Result<UsersConfig> {
    let mut config = match env::var("COOKIE_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD.decode(secret_b64.trim())?;
            let secret: [u8; 32] = secret_bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("COOKIE_SECRET must decode to 32 bytes"))?;
            UsersConfig {
                cookie_secret: secret,
                cookie_secure: !cfg!(debug_assertions),
                ..UsersConfig::default()
            }
        }
        Err(_) if cfg!(debug_assertions) => UsersConfig::development(),
        Err(_) => anyhow::bail!("COOKIE_SECRET must be set in production"),
    };

    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    Ok(config)
}
