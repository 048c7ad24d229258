//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod logging;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use account::domain::SessionRepository;
use account::{
    PgAccountRepository, PgAuditLog, SessionLayerState, TracingAuditSink, account_router,
    resolve_session,
};
use axum::middleware::from_fn_with_state;
use axum::{
    Router, http,
    http::{Method, header},
};
use community::{CommentRetention, PgCommunityRepository, community_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// How often expired sessions and comments are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init(&config.log_file, &config.log_level)?;

    let account_config = Arc::new(config.account_config()?);

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let accounts = Arc::new(PgAccountRepository::new(pool.clone()));
    let community = Arc::new(PgCommunityRepository::new(pool.clone()));
    let audit = Arc::new((TracingAuditSink, PgAuditLog::new(pool.clone())));

    // Startup cleanup, then hourly. Failures never stop the server.
    cleanup(&accounts, &community).await;
    {
        let accounts = accounts.clone();
        let community = community.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cleanup(&accounts, &community).await;
            }
        });
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    // Every /api route sees the caller's session, if any.
    let api = account_router(accounts.clone(), audit.clone(), account_config.clone())
        .merge(community_router(community, audit))
        .layer(from_fn_with_state(
            SessionLayerState {
                sessions: accounts,
                config: account_config,
            },
            resolve_session::<PgAccountRepository>,
        ));

    let app = Router::new().nest("/api", api).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(production = config.production, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn cleanup(accounts: &Arc<PgAccountRepository>, community: &Arc<PgCommunityRepository>) {
    match accounts.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    if let Err(e) = CommentRetention::new(community.clone())
        .purge(chrono::Utc::now())
        .await
    {
        tracing::warn!(error = %e, "Comment purge failed, continuing anyway");
    }
}
