// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Market quotes from the exchange backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ProviderError;
use super::http::ApiHttp;
use crate::exchange::{FiatMarket, ModelError, Quote, RateSource};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QuoteResponse {
    pair: String,
    price: Decimal,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: ApiHttp,
}

impl QuoteClient {
    pub fn new(http: ApiHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RateSource for QuoteClient {
    async fn fetch_quote(&self, market: &FiatMarket) -> Result<Quote, ProviderError> {
        let pair = market.to_string();
        let response: QuoteResponse = self
            .http
            .get_json(&["markets", "quotes", &pair], &[], None)
            .await?;

        let returned: FiatMarket = response
            .pair
            .parse()
            .map_err(|e: ModelError| ProviderError::InvalidResponse(e.to_string()))?;
        if &returned != market {
            return Err(ProviderError::InvalidResponse(format!(
                "quote returned for {returned}, requested {market}"
            )));
        }
        if response.price <= Decimal::ZERO {
            return Err(ProviderError::InvalidResponse(format!(
                "non-positive price {} for {market}",
                response.price
            )));
        }

        Ok(Quote {
            market: returned,
            price: response.price,
            timestamp: response.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &MockServer) -> QuoteClient {
        QuoteClient::new(ApiHttp::new(&server.base_url(), Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn fetches_quote_for_market() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/markets/quotes/BTC-EUR");
                then.status(200).json_body(json!({
                    "pair": "BTC-EUR",
                    "price": "41250.10",
                    "timestamp": "2026-01-01T12:00:00Z"
                }));
            })
            .await;

        let market: FiatMarket = "BTC-EUR".parse().unwrap();
        let quote = client(&server).fetch_quote(&market).await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.market, market);
        assert_eq!(quote.price, dec!(41250.10));
    }

    #[tokio::test]
    async fn zero_price_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/markets/quotes/ETH-EUR");
                then.status(200).json_body(json!({
                    "pair": "ETH-EUR",
                    "price": "0",
                    "timestamp": "2026-01-01T12:00:00Z"
                }));
            })
            .await;

        let market: FiatMarket = "ETH-EUR".parse().unwrap();
        let err = client(&server).fetch_quote(&market).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
