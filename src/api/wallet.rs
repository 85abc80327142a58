// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::WalletContext,
    error::ApiError,
    models::{AttachWalletRequest, WalletContextResponse},
    state::AppState,
    storage::ensure_safe_key,
};

/// Attach the wallet the service acts for.
///
/// Replaces any attached wallet and drops the cached session token.
#[utoipa::path(
    put,
    path = "/v1/wallet/context",
    request_body = AttachWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = WalletContextResponse),
        (status = 400, description = "Wallet id is not a valid storage key")
    )
)]
pub async fn attach_wallet(
    State(state): State<AppState>,
    Json(request): Json<AttachWalletRequest>,
) -> Result<Json<WalletContextResponse>, ApiError> {
    ensure_safe_key(&request.wallet_id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    if request.credential.trim().is_empty() {
        return Err(ApiError::bad_request("credential must not be empty"));
    }

    let wallet = WalletContext::new(request.wallet_id, request.credential);
    state.auth.attach_wallet(&wallet).await?;

    Ok(Json(WalletContextResponse {
        attached: true,
        wallet_id: Some(wallet.wallet_id),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/wallet/context",
    tag = "Wallet",
    responses((status = 200, body = WalletContextResponse))
)]
pub async fn get_wallet(
    State(state): State<AppState>,
) -> Result<Json<WalletContextResponse>, ApiError> {
    let wallet_id = state.auth.provisioner().wallet_id().await?;
    Ok(Json(WalletContextResponse {
        attached: wallet_id.is_some(),
        wallet_id,
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/wallet/context",
    tag = "Wallet",
    responses((status = 204))
)]
pub async fn detach_wallet(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.auth.detach_wallet().await?;
    Ok(StatusCode::NO_CONTENT)
}
