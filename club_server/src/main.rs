//! Chess club website backend.
//!
//! Serves the tournament bracket API and the club-site plumbing
//! (events, membership, contact, player profiles) over REST, backed by
//! PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use chess_club::club::{
    PgContactRepository, PgEventRepository, PgMembershipRepository, PgPlayerRepository,
};
use chess_club::db::Database;
use chess_club::store::PgTournamentStore;
use club_server::{api, config::ServerConfig, logging};
use pico_args::Arguments;

const HELP: &str = "\
Run the chess club website backend

USAGE:
  club_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:3000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/chess_club]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  MAX_TOURNAMENT_SIZE      Upper bound on tournament registration caps
  RUST_LOG                 Log filter (e.g., info,sqlx=warn)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let database_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, database_url_override)?;
    config.validate()?;

    tracing::info!(bind = %config.bind, "Starting chess club server");

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
    tracing::info!("Database connected successfully");

    let pool = Arc::new(db.pool().clone());
    let state = api::AppState {
        tournaments: Arc::new(PgTournamentStore::new(pool.clone())),
        events: Arc::new(PgEventRepository::new(pool.clone())),
        membership: Arc::new(PgMembershipRepository::new(pool.clone())),
        contact: Arc::new(PgContactRepository::new(pool.clone())),
        players: Arc::new(PgPlayerRepository::new(pool)),
        max_tournament_size: config.club.max_tournament_size,
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
