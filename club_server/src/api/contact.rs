//! Contact form API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chess_club::club::ContactMessage;
use serde::Deserialize;
use uuid::Uuid;

use super::{club_error, error_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

pub async fn submit_message(
    State(state): State<AppState>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    if request.body.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "body must not be empty"));
    }

    let message = ContactMessage::new(request.name, request.email, request.subject, request.body);
    state.contact.submit(&message).await.map_err(club_error)?;

    tracing::info!(message_id = %message.id, "Contact message submitted");
    Ok((StatusCode::CREATED, Json(message)))
}

/// List all messages, newest first. Unread messages keep `read: false`
/// until explicitly marked.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let messages = state.contact.list().await.map_err(club_error)?;
    Ok(Json(messages))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.contact.mark_read(id).await.map_err(club_error)?;
    Ok(StatusCode::NO_CONTENT)
}
