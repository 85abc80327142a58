// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::exchange::{ExchangeError, ModelError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(
                status = %self.status,
                error_code = self.code,
                error = %self.message,
                "Request failed"
            );
        }
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<ExchangeError> for ApiError {
    fn from(e: ExchangeError) -> Self {
        let status = match &e {
            ExchangeError::NotInitialized => StatusCode::CONFLICT,
            ExchangeError::AuthenticationFailed(_) => StatusCode::BAD_GATEWAY,
            ExchangeError::LimitsFetchFailed(_)
            | ExchangeError::BalanceFetchFailed(_)
            | ExchangeError::QuoteUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ExchangeError::AssetNotTradable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ExchangeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.error_code(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::AssetType;
    use crate::providers::ProviderError;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_code() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.code, "not_found");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");
    }

    #[test]
    fn exchange_errors_map_to_statuses() {
        let cases = [
            (ExchangeError::NotInitialized, StatusCode::CONFLICT),
            (
                ExchangeError::AuthenticationFailed("x".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ExchangeError::LimitsFetchFailed(ProviderError::Request("x".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ExchangeError::BalanceFetchFailed(ProviderError::Request("x".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ExchangeError::AssetNotTradable {
                    asset: AssetType::Pax,
                    reason: "paused".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ExchangeError::InvalidInput(ModelError::new("amount", "negative")),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, status) in cases {
            let code = error.error_code();
            let api = ApiError::from(error);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn auth_errors_keep_their_status() {
        let api = ApiError::from(AuthError::NotInitialized);
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "not_initialized");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data","error_code":"invalid_input"}"#);
    }
}
