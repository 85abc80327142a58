// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    exchange::{
        convert_amount, AccountId, ExchangeError, FiatCurrency, FiatMarket, OrderRequest,
        TradingPair,
    },
    models::{
        AssetInfo, LimitsResponse, QuoteResponse, ValidateOrderRequest, ValidateOrderResponse,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/exchange/assets",
    tag = "Exchange",
    responses((status = 200, body = [AssetInfo]))
)]
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<AssetInfo>> {
    Json(AssetInfo::catalogue(state.orders.capabilities()))
}

/// Trading limits of the attached user in a fiat currency.
#[utoipa::path(
    get,
    path = "/v1/exchange/limits/{currency}",
    params(
        ("currency" = String, Path, description = "ISO 4217 code, e.g. EUR")
    ),
    tag = "Exchange",
    responses(
        (status = 200, body = LimitsResponse),
        (status = 409, description = "No wallet attached"),
        (status = 503, description = "Limits backend unavailable")
    )
)]
pub async fn get_limits(
    Path(currency): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LimitsResponse>, ApiError> {
    let currency = FiatCurrency::parse(&currency)?;
    let limits = state.orders.fetch_limits(&currency).await?;
    Ok(Json(LimitsResponse::from(limits)))
}

#[utoipa::path(
    get,
    path = "/v1/exchange/quotes",
    tag = "Exchange",
    responses((status = 200, body = [QuoteResponse]))
)]
pub async fn list_quotes(State(state): State<AppState>) -> Json<Vec<QuoteResponse>> {
    Json(
        state
            .rates
            .snapshot()
            .into_iter()
            .map(QuoteResponse::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/v1/exchange/quotes/{pair}",
    params(
        ("pair" = String, Path, description = "Market, e.g. BTC-EUR")
    ),
    tag = "Exchange",
    responses(
        (status = 200, body = QuoteResponse),
        (status = 404, description = "No quote polled for this market yet")
    )
)]
pub async fn get_quote(
    Path(pair): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let market: FiatMarket = pair.parse()?;
    let quote = state
        .rates
        .latest(&market)
        .ok_or_else(|| ApiError::not_found(format!("no quote for {market}")))?;
    Ok(Json(QuoteResponse::from(quote)))
}

/// Convert an amount with the latest quote and classify the resulting order.
///
/// A rejected order is still a 200; only failures to classify are errors.
#[utoipa::path(
    post,
    path = "/v1/exchange/validate",
    request_body = ValidateOrderRequest,
    tag = "Exchange",
    responses(
        (status = 200, body = ValidateOrderResponse),
        (status = 400, description = "Malformed order"),
        (status = 409, description = "No wallet attached"),
        (status = 422, description = "Asset not tradable"),
        (status = 503, description = "Limits, balance or quote unavailable")
    )
)]
pub async fn validate_order(
    State(state): State<AppState>,
    Json(request): Json<ValidateOrderRequest>,
) -> Result<Json<ValidateOrderResponse>, ApiError> {
    let pair: TradingPair = request.pair.parse()?;
    let fiat = FiatCurrency::parse(&request.fiat)?;
    let account_id = AccountId::parse(&request.account_id)?;

    state.orders.check_tradable(pair)?;

    let market = FiatMarket::new(pair.from, fiat.clone());
    let quote = state
        .rates
        .latest(&market)
        .ok_or(ExchangeError::QuoteUnavailable(market))?;
    let amounts = convert_amount(request.amount, request.fix, &quote)?;

    let report = state
        .orders
        .validate_order(&OrderRequest {
            pair,
            fiat,
            account_id,
            volume: amounts.volume,
            fiat_value: amounts.fiat_value,
        })
        .await?;

    info!(
        pair = %pair,
        outcome = report.outcome.code(),
        "Order validated via API"
    );
    Ok(Json(ValidateOrderResponse::from_report(
        &report,
        amounts.price,
    )))
}
