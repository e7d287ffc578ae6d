//! Serves the board protocol over HTTP from a `PostgreSQL` store.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/boardwalk boardwalk
//! ```
//!
//! `BOARDWALK_BIND_ADDR` selects the listen address (default
//! `127.0.0.1:8080`) and `BOARDWALK_LOG_FORMAT=json` switches to JSON logs.
//! Board behaviour is configured through the `BOARDWALK_*` variables read by
//! [`BoardConfig::from_env`].

use boardwalk::board::adapters::http::{BoardHttpState, board_router};
use boardwalk::board::adapters::postgres::{BoardPgPool, PostgresBoardStore};
use boardwalk::board::services::{BoardSyncService, ColumnManager};
use boardwalk::config::{BoardConfig, ConfigError};
use boardwalk::telemetry::{LogFormat, TelemetryError, init_tracing};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum ServerError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    run().await.map_err(Into::into)
}

async fn run() -> Result<(), ServerError> {
    let log_format = env::var("BOARDWALK_LOG_FORMAT")
        .map(|name| LogFormat::from_name(&name))
        .unwrap_or_default();
    init_tracing(log_format)?;

    let config = Arc::new(BoardConfig::from_env()?);
    let database_url = env::var("DATABASE_URL").map_err(|_| ServerError::MissingDatabaseUrl)?;
    let bind_addr = env::var("BOARDWALK_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());

    let pool: BoardPgPool = diesel::r2d2::Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .map_err(ServerError::Pool)?;
    let store = Arc::new(PostgresBoardStore::new(pool));
    let clock = Arc::new(DefaultClock);

    let state = Arc::new(BoardHttpState::new(
        ColumnManager::new(Arc::clone(&store), Arc::clone(&clock), Arc::clone(&config)),
        BoardSyncService::new(store, clock, Arc::clone(&config)),
    ));
    let router = board_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %bind_addr,
        poll_interval_secs = config.poll_interval_secs(),
        "board server listening"
    );
    axum::serve(listener, router)
        .await
        .map_err(ServerError::Serve)
}
