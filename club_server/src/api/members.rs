//! Membership application API handlers.
//!
//! Prospective members apply through the site form; a committee member
//! reviews each pending application exactly once. A second pending
//! application from the same email is rejected with `409 Conflict`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chess_club::club::{ApplicationStatus, MembershipApplication};
use serde::Deserialize;
use uuid::Uuid;

use super::{club_error, error_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub experience: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub approve: bool,
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<MembershipApplication>), ApiError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "a valid email address is required",
        ));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "name must not be empty"));
    }

    let application = MembershipApplication::new(
        request.first_name,
        request.last_name,
        request.email,
        request.experience,
        request.message,
    );
    state
        .membership
        .submit(&application)
        .await
        .map_err(club_error)?;

    tracing::info!(application_id = %application.id, "Membership application submitted");
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<Vec<MembershipApplication>>, ApiError> {
    let applications = state
        .membership
        .list(query.status)
        .await
        .map_err(club_error)?;
    Ok(Json(applications))
}

/// Approve or reject a pending application.
///
/// Reviewing an application that is not pending returns `404`, so a
/// double review cannot flip an earlier decision.
pub async fn review_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<MembershipApplication>, ApiError> {
    let reviewed = state
        .membership
        .review(id, request.approve)
        .await
        .map_err(club_error)?;

    tracing::info!(
        application_id = %id,
        approved = request.approve,
        "Membership application reviewed"
    );
    Ok(Json(reviewed))
}
