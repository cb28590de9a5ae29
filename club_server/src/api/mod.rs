//! HTTP REST API for the chess-club backend.
//!
//! # Architecture
//!
//! - **Axum**: async web framework for the REST surface
//! - **Tower**: middleware for CORS and request correlation
//! - **Injected stores**: every handler works against the repository
//!   traits from `chess_club`, so the router can be driven end-to-end
//!   against the in-memory implementations in tests
//!
//! # Endpoints Overview
//!
//! ## Tournaments
//! - `GET    /api/v1/tournaments` - List tournaments
//! - `POST   /api/v1/tournaments` - Create tournament
//! - `GET    /api/v1/tournaments/{id}` - Get full bracket state
//! - `POST   /api/v1/tournaments/{id}/register` - Register a participant
//! - `DELETE /api/v1/tournaments/{id}/register/{participant_id}` - Withdraw
//! - `POST   /api/v1/tournaments/{id}/start` - Generate bracket, open round 1
//! - `POST   /api/v1/tournaments/{id}/cancel` - Cancel (terminal)
//! - `POST   /api/v1/tournaments/{id}/rounds/{round}/matchups/{matchup}` - Record result
//!
//! ## Club site
//! - `GET/POST /api/v1/events`, `GET/PUT/DELETE /api/v1/events/{id}`
//! - `GET/POST /api/v1/membership`, `POST /api/v1/membership/{id}/review`
//! - `GET/POST /api/v1/contact`, `POST /api/v1/contact/{id}/read`
//! - `GET /api/v1/players/{id}`, `PUT /api/v1/players/{id}`, `GET /api/v1/leaderboard`
//!
//! ## Health Check
//! - `GET /health` - Server health status

pub mod contact;
pub mod events;
pub mod members;
pub mod players;
pub mod request_id;
pub mod tournaments;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use chess_club::club::{
    ClubError, ContactRepository, EventRepository, MembershipRepository, PlayerRepository,
};
use chess_club::store::StoreError;
use chess_club::{BracketError, TournamentStore};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap, all Arc). Handlers depend only on the
/// repository traits, never on a concrete database.
#[derive(Clone)]
pub struct AppState {
    pub tournaments: Arc<dyn TournamentStore>,
    pub events: Arc<dyn EventRepository>,
    pub membership: Arc<dyn MembershipRepository>,
    pub contact: Arc<dyn ContactRepository>,
    pub players: Arc<dyn PlayerRepository>,
    /// Upper bound on a tournament's registration cap
    pub max_tournament_size: usize,
}

/// JSON error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_body(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Map engine errors onto HTTP statuses: a bad matchup address is a
/// missing resource, everything else is a validation failure.
pub(crate) fn bracket_error(err: BracketError) -> ApiError {
    let status = match err {
        BracketError::InvalidMatchup { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    error_body(status, err.to_string())
}

pub(crate) fn store_error(err: StoreError) -> ApiError {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists(_) | StoreError::Conflict { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, err.to_string())
}

pub(crate) fn club_error(err: ClubError) -> ApiError {
    let status = match err {
        ClubError::NotFound(_) => StatusCode::NOT_FOUND,
        ClubError::DuplicateApplication(_) => StatusCode::CONFLICT,
        ClubError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, err.to_string())
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route(
            "/tournaments/{id}/register",
            post(tournaments::register_participant),
        )
        .route(
            "/tournaments/{id}/register/{participant_id}",
            delete(tournaments::withdraw_participant),
        )
        .route("/tournaments/{id}/start", post(tournaments::start_tournament))
        .route("/tournaments/{id}/cancel", post(tournaments::cancel_tournament))
        .route(
            "/tournaments/{id}/rounds/{round}/matchups/{matchup}",
            post(tournaments::record_result),
        )
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/membership",
            get(members::list_applications).post(members::submit_application),
        )
        .route("/membership/{id}/review", post(members::review_application))
        .route(
            "/contact",
            get(contact::list_messages).post(contact::submit_message),
        )
        .route("/contact/{id}/read", post(contact::mark_read))
        .route(
            "/players/{id}",
            get(players::get_player).put(players::upsert_player),
        )
        .route("/leaderboard", get(players::leaderboard))
}

/// Health check endpoint for monitoring and load balancers.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
