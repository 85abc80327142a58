// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Trading limits for the signed-in user.
//!
//! Limits are fetched fresh for every validation and never cached. A 401
//! from the backend means the session token was revoked server-side: the
//! token is invalidated and the call retried once with a new token.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::ProviderError;
use super::http::ApiHttp;
use crate::auth::AuthenticationService;
use crate::exchange::{FiatCurrency, LimitsSource, TradeLimits};

const LIMITS_PATH: &[&str] = &["trades", "limits"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LimitsResponse {
    currency: String,
    min_order: Decimal,
    max_possible_order: Decimal,
    #[serde(default)]
    daily: Option<AvailableAmount>,
    #[serde(default)]
    annual: Option<AvailableAmount>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AvailableAmount {
    available: Decimal,
}

impl LimitsResponse {
    fn into_limits(self, requested: &FiatCurrency) -> Result<TradeLimits, ProviderError> {
        let currency = FiatCurrency::parse(&self.currency)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        if &currency != requested {
            return Err(ProviderError::InvalidResponse(format!(
                "limits returned for {currency}, requested {requested}"
            )));
        }
        TradeLimits::new(
            currency,
            self.min_order,
            self.max_possible_order,
            self.daily.map(|d| d.available),
            self.annual.map(|a| a.available),
        )
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

pub struct LimitsClient {
    http: ApiHttp,
    auth: Arc<AuthenticationService>,
}

impl LimitsClient {
    pub fn new(http: ApiHttp, auth: Arc<AuthenticationService>) -> Self {
        Self { http, auth }
    }

    async fn request(&self, currency: &FiatCurrency) -> Result<LimitsResponse, ProviderError> {
        let token = self.auth.get_token(false).await?;
        self.http
            .get_json(
                LIMITS_PATH,
                &[("currency", currency.as_str())],
                Some(token.bearer()),
            )
            .await
    }
}

#[async_trait]
impl LimitsSource for LimitsClient {
    /// A 401 means the session token was revoked: it is invalidated and the
    /// call replayed once. Every other failure is returned as is.
    async fn fetch_limits(&self, currency: &FiatCurrency) -> Result<TradeLimits, ProviderError> {
        let response = match self.request(currency).await {
            Err(e) if e.is_unauthorized() => {
                warn!(currency = %currency, "Limits request unauthorized; refreshing session token");
                self.auth.invalidate();
                self.request(currency).await?
            }
            other => other?,
        };

        let limits = response.into_limits(currency)?;
        debug!(
            currency = %currency,
            min_order = %limits.min_order,
            max_possible_order = %limits.max_possible_order,
            "Fetched trade limits"
        );
        Ok(limits)
    }
}
