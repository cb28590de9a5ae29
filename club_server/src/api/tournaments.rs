//! Tournament API handlers.
//!
//! These endpoints expose the bracket lifecycle: create a tournament,
//! register participants while it accepts entries, start it to generate
//! the bracket, record match results round by round, and cancel it.
//!
//! Every mutating handler follows the same load-mutate-save shape: the
//! tournament is loaded from the store, the engine applies the change
//! in memory, and the save carries the loaded revision so two admins
//! recording results at once cannot silently overwrite each other
//! (the loser of the race gets `409 Conflict` and retries).
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Spring Open", "description": "Annual knockout", "max_participants": 16}'
//! ```
//!
//! Record a result (round and matchup are zero-based indexes):
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/tournaments/ID/rounds/0/matchups/1 \
//!   -H "Content-Type: application/json" \
//!   -d '{"winner_id": "PLAYER-UUID"}'
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chess_club::bracket::{BracketEngine, Participant, Tournament, TournamentStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{bracket_error, error_body, store_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: String,
    pub max_participants: usize,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub location: Option<String>,
    pub entry_fee: Option<i64>,
    #[serde(default)]
    pub prizes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTournamentsQuery {
    /// Optional status filter: registration, in-progress, completed, cancelled
    pub status: Option<TournamentStatus>,
}

/// Compact row for the tournament listing page
#[derive(Debug, Serialize)]
pub struct TournamentSummary {
    pub id: Uuid,
    pub name: String,
    pub status: TournamentStatus,
    pub participant_count: usize,
    pub max_participants: usize,
    pub current_round: u32,
    pub winner: Option<String>,
}

impl From<&Tournament> for TournamentSummary {
    fn from(tournament: &Tournament) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name.clone(),
            status: tournament.status,
            participant_count: tournament.participants.len(),
            max_participants: tournament.max_participants,
            current_round: tournament.current_round,
            winner: tournament.winner.as_ref().map(|w| w.display_name.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub display_name: String,
    pub rating: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub winner_id: Uuid,
}

/// List tournaments, newest first, optionally filtered by status.
pub async fn list_tournaments(
    State(state): State<AppState>,
    Query(query): Query<ListTournamentsQuery>,
) -> Result<Json<Vec<TournamentSummary>>, ApiError> {
    let tournaments = state
        .tournaments
        .list(query.status)
        .await
        .map_err(store_error)?;
    Ok(Json(tournaments.iter().map(TournamentSummary::from).collect()))
}

/// Create a tournament open for registration.
///
/// Returns `201 Created` with the full tournament record.
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "name must not be empty"));
    }
    if request.max_participants < 2 || request.max_participants > state.max_tournament_size {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            format!(
                "max_participants must be between 2 and {}",
                state.max_tournament_size
            ),
        ));
    }

    let mut tournament =
        Tournament::new(request.name, request.description, request.max_participants);
    tournament.start_date = request.start_date;
    tournament.location = request.location;
    tournament.entry_fee = request.entry_fee;
    tournament.prizes = request.prizes;

    state
        .tournaments
        .create(&tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(tournament_id = %tournament.id, name = %tournament.name, "Tournament created");
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Get the full tournament record including the bracket.
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state.tournaments.load(id).await.map_err(store_error)?;
    Ok(Json(tournament))
}

/// Register a participant while the tournament accepts entries.
pub async fn register_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    if request.display_name.trim().is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "display_name must not be empty",
        ));
    }

    let mut tournament = state.tournaments.load(id).await.map_err(store_error)?;
    let participant = Participant::new(request.display_name, request.rating);
    let participant_id = participant.id;

    {
        let engine = BracketEngine::new();
        engine
            .register_participant(&mut tournament, participant)
            .map_err(bracket_error)?;
    }
    state
        .tournaments
        .save(&mut tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(
        tournament_id = %id,
        participant_id = %participant_id,
        "Participant registered"
    );
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Withdraw a participant before the tournament starts.
///
/// Withdrawing an ID that is not registered is a no-op, not an error.
pub async fn withdraw_participant(
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Tournament>, ApiError> {
    let mut tournament = state.tournaments.load(id).await.map_err(store_error)?;

    {
        let engine = BracketEngine::new();
        engine
            .withdraw_participant(&mut tournament, participant_id)
            .map_err(bracket_error)?;
    }
    state
        .tournaments
        .save(&mut tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(
        tournament_id = %id,
        participant_id = %participant_id,
        "Participant withdrawn"
    );
    Ok(Json(tournament))
}

/// Close registration, generate the bracket, and open round 1.
pub async fn start_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tournament>, ApiError> {
    let mut tournament = state.tournaments.load(id).await.map_err(store_error)?;

    {
        let mut engine = BracketEngine::new();
        engine
            .start_tournament(&mut tournament)
            .map_err(bracket_error)?;
    }
    state
        .tournaments
        .save(&mut tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(
        tournament_id = %id,
        rounds = tournament.rounds.len(),
        participants = tournament.participants.len(),
        "Tournament started"
    );
    Ok(Json(tournament))
}

/// Cancel a tournament that has not finished.
pub async fn cancel_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tournament>, ApiError> {
    let mut tournament = state.tournaments.load(id).await.map_err(store_error)?;

    {
        let engine = BracketEngine::new();
        engine
            .cancel_tournament(&mut tournament)
            .map_err(bracket_error)?;
    }
    state
        .tournaments
        .save(&mut tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(tournament_id = %id, "Tournament cancelled");
    Ok(Json(tournament))
}

/// Record the winner of one matchup and advance them.
///
/// `round` and `matchup` are zero-based indexes into the bracket as
/// returned by `GET /tournaments/{id}`.
pub async fn record_result(
    State(state): State<AppState>,
    Path((id, round, matchup)): Path<(Uuid, usize, usize)>,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<Tournament>, ApiError> {
    let mut tournament = state.tournaments.load(id).await.map_err(store_error)?;

    {
        let engine = BracketEngine::new();
        engine
            .record_winner(&mut tournament, round, matchup, request.winner_id)
            .map_err(bracket_error)?;
    }
    state
        .tournaments
        .save(&mut tournament)
        .await
        .map_err(store_error)?;

    tracing::info!(
        tournament_id = %id,
        round = round,
        matchup = matchup,
        winner_id = %request.winner_id,
        "Result recorded"
    );
    Ok(Json(tournament))
}
