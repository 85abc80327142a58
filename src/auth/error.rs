// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Authentication error type.
///
/// None of these are fatal: every one is resolved by attaching a wallet or
/// retrying the user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No wallet context has been attached yet
    NotInitialized,
    /// Token issuance failed or returned an invalid payload
    AuthenticationFailed(String),
    /// One-time user signup failed
    SignupFailed(String),
    /// Durable identity storage could not be read or written
    Storage(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotInitialized => "not_initialized",
            AuthError::AuthenticationFailed(_) => "authentication_failed",
            AuthError::SignupFailed(_) => "signup_failed",
            AuthError::Storage(_) => "storage_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotInitialized => StatusCode::CONFLICT,
            AuthError::AuthenticationFailed(_) | AuthError::SignupFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotInitialized => {
                write!(f, "No wallet is attached; attach a wallet context first")
            }
            AuthError::AuthenticationFailed(msg) => write!(f, "Authentication failed: {msg}"),
            AuthError::SignupFailed(msg) => write!(f, "User signup failed: {msg}"),
            AuthError::Storage(msg) => write!(f, "Identity storage error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotInitialized => AuthError::NotInitialized,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
