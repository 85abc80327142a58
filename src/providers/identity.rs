// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exchange backend identity endpoints: one-time signup and session token
//! issuance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::http::ApiHttp;
use crate::auth::{
    ProvisionedIdentity, SessionToken, SignupApi, SignupResult, TokenIssuer, WalletContext,
};

const SIGNUP_PATH: &[&str] = &["users"];
const AUTH_PATH: &[&str] = &["auth"];
const WALLET_ID_HEADER: &str = "X-Wallet-Id";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    wallet_id: &'a str,
    credential: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SignupResponse {
    user_id: String,
    lifetime_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    user_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AuthResponse {
    user_id: String,
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: ApiHttp,
}

impl IdentityClient {
    pub fn new(http: ApiHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SignupApi for IdentityClient {
    async fn sign_up(&self, wallet: &WalletContext) -> Result<SignupResult, ProviderError> {
        let body = SignupRequest {
            wallet_id: &wallet.wallet_id,
            credential: wallet.credential(),
        };
        let response: SignupResponse = self.http.post_json(SIGNUP_PATH, &body, &[], None).await?;

        if response.lifetime_token.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "signup returned an empty lifetime token".to_string(),
            ));
        }

        Ok(SignupResult {
            user_id: response.user_id,
            lifetime_token: SecretString::from(response.lifetime_token),
        })
    }
}

#[async_trait]
impl TokenIssuer for IdentityClient {
    async fn issue(&self, identity: &ProvisionedIdentity) -> Result<SessionToken, ProviderError> {
        let body = AuthRequest {
            user_id: &identity.user_id,
        };
        let response: AuthResponse = self
            .http
            .post_json(
                AUTH_PATH,
                &body,
                &[(WALLET_ID_HEADER, identity.wallet_id.as_str())],
                Some(identity.lifetime_token()),
            )
            .await?;

        if response.token.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "auth returned an empty token".to_string(),
            ));
        }

        Ok(SessionToken::new(
            response.user_id,
            response.token,
            response.expires_at,
        ))
    }
}
