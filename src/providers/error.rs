// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors raised by the remote service clients.

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider configuration missing: {0}")]
    MissingConfig(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("response was invalid: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ProviderError {
    /// HTTP 401 from the remote service.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderError::Status { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_route() {
        let err = ProviderError::Status {
            method: "GET",
            path: "/trades/limits".to_string(),
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "GET /trades/limits returned 503: down");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn auth_errors_are_transparent() {
        let err = ProviderError::from(AuthError::NotInitialized);
        assert_eq!(err.to_string(), AuthError::NotInitialized.to_string());
    }
}
