//! Player profile and leaderboard API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chess_club::club::PlayerProfile;
use serde::Deserialize;
use uuid::Uuid;

use super::{club_error, error_body, ApiError, AppState};

/// Leaderboard rows are capped regardless of the requested limit.
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct UpsertPlayerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: u32,
    #[serde(default)]
    pub games_played: u32,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerProfile>, ApiError> {
    let profile = state.players.get(id).await.map_err(club_error)?;
    Ok(Json(profile))
}

/// Create or replace a player profile at the given ID.
pub async fn upsert_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpsertPlayerRequest>,
) -> Result<Json<PlayerProfile>, ApiError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "name must not be empty"));
    }

    let mut profile = PlayerProfile::new(
        request.first_name,
        request.last_name,
        request.email,
        request.rating,
    );
    profile.id = id;
    profile.games_played = request.games_played;

    state.players.upsert(&profile).await.map_err(club_error)?;
    Ok(Json(profile))
}

/// Top rated players, highest first.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<PlayerProfile>>, ApiError> {
    if query.limit < 1 {
        return Err(error_body(StatusCode::BAD_REQUEST, "limit must be positive"));
    }
    let limit = query.limit.min(MAX_LEADERBOARD_LIMIT);
    let board = state.players.leaderboard(limit).await.map_err(club_error)?;
    Ok(Json(board))
}
