// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token inspection. The bearer never leaves the process; these
//! endpoints report ownership and expiry only.

use axum::{extract::State, http::StatusCode, Json};

use crate::{error::ApiError, models::SessionStatusResponse, state::AppState};

#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses((status = 200, body = SessionStatusResponse))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse::from(state.auth.status()))
}

/// Force issuance of a new session token.
#[utoipa::path(
    post,
    path = "/v1/session/refresh",
    tag = "Session",
    responses(
        (status = 200, body = SessionStatusResponse),
        (status = 409, description = "No wallet attached"),
        (status = 502, description = "Token issuance failed")
    )
)]
pub async fn refresh_session(
    State(state): State<AppState>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    state.auth.get_token(true).await?;
    Ok(Json(SessionStatusResponse::from(state.auth.status())))
}

#[utoipa::path(
    delete,
    path = "/v1/session",
    tag = "Session",
    responses((status = 204))
)]
pub async fn invalidate_session(State(state): State<AppState>) -> StatusCode {
    state.auth.invalidate();
    StatusCode::NO_CONTENT
}
