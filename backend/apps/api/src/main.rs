//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{
    AuthAppState, AuthConfig, FixtureIdentityGateway, HttpIdentityGateway, PgAccountRepository,
    TracingMailer, auth_router,
};
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use chrono::TimeDelta;
use kernel::error::app_error::AppError;
use platform::config::{env_parse_or, env_string, require_env};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Process configuration read from the environment
struct ServerConfig {
    database_url: String,
    database_max_connections: u32,
    bind_addr: SocketAddr,
    /// `(url, api key)`; absent means the fixture gateway (debug builds only)
    identity: Option<(String, String)>,
    verification_ttl: TimeDelta,
    app_url: String,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let identity = match (env_string("IDENTITY_URL"), env_string("IDENTITY_API_KEY")) {
            (Some(url), Some(key)) => Some((url, key)),
            _ if cfg!(debug_assertions) => None,
            _ => anyhow::bail!("IDENTITY_URL and IDENTITY_API_KEY must be set in production"),
        };

        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: env_parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?,
            identity,
            verification_ttl: verification_ttl(env_parse_or("VERIFICATION_TTL_HOURS", 24)?)?,
            app_url: env_string("APP_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}

/// Token lifetime in whole hours; must be positive and representable
fn verification_ttl(hours: i64) -> anyhow::Result<TimeDelta> {
    if hours <= 0 {
        anyhow::bail!("VERIFICATION_TTL_HOURS must be positive (got {hours})");
    }
    TimeDelta::try_hours(hours)
        .ok_or_else(|| anyhow::anyhow!("VERIFICATION_TTL_HOURS is out of range (got {hours})"))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    AppError::not_found("요청한 경로를 찾을 수 없습니다.")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(server.database_max_connections)
        .connect(&server.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = Arc::new(
        AuthConfig::default()
            .with_app_url(server.app_url)
            .with_verification_ttl(server.verification_ttl),
    );

    let repo = PgAccountRepository::new(pool.clone());
    let mailer = TracingMailer::new(auth_config.clone());

    let auth = match server.identity {
        Some((url, api_key)) => {
            tracing::info!(identity_url = %url, "Using HTTP identity provider");
            auth_router(AuthAppState::new(
                repo,
                HttpIdentityGateway::new(url, api_key),
                mailer,
                auth_config,
            ))
        }
        None => {
            tracing::warn!("IDENTITY_URL not set; using fixture identity gateway");
            auth_router(AuthAppState::new(
                repo,
                FixtureIdentityGateway::seeded().with_session_ttl(auth_config.session_ttl),
                mailer,
                auth_config,
            ))
        }
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Listening on {}", server.bind_addr);

    let listener = TcpListener::bind(server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
