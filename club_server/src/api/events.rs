//! Event listing API handlers.
//!
//! CRUD surface for the club's event calendar: simuls, rapid nights,
//! and the social calendar shown on the public site. Listing defaults
//! to upcoming events only; pass `?upcoming=false` for the archive.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chess_club::club::Event;
use serde::Deserialize;
use uuid::Uuid;

use super::{club_error, error_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub location: Option<String>,
    pub entry_fee: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    #[serde(default = "default_upcoming")]
    pub upcoming: bool,
}

fn default_upcoming() -> bool {
    true
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.events.list(query.upcoming).await.map_err(club_error)?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    if request.title.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "title must not be empty"));
    }

    let mut event = Event::new(request.title, request.description, request.starts_at);
    event.location = request.location;
    event.entry_fee = request.entry_fee;

    state.events.create(&event).await.map_err(club_error)?;

    tracing::info!(event_id = %event.id, title = %event.title, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state.events.get(id).await.map_err(club_error)?;
    Ok(Json(event))
}

/// Replace an event's editable fields. The ID and creation timestamp
/// are kept from the stored record.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let mut event = state.events.get(id).await.map_err(club_error)?;
    event.title = request.title;
    event.description = request.description;
    event.starts_at = request.starts_at;
    event.location = request.location;
    event.entry_fee = request.entry_fee;

    state.events.update(&event).await.map_err(club_error)?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.events.delete(id).await.map_err(club_error)?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}
