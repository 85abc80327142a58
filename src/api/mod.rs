// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    exchange::{AssetType, Fix, PeriodicWindow},
    models::{
        AssetInfo, AttachWalletRequest, LimitsResponse, QuoteResponse, SessionStatusResponse,
        ValidateOrderRequest, ValidateOrderResponse, WalletContextResponse,
    },
    state::AppState,
};

pub mod exchange;
pub mod health;
pub mod session;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/wallet/context",
            put(wallet::attach_wallet)
                .get(wallet::get_wallet)
                .delete(wallet::detach_wallet),
        )
        .route(
            "/session",
            get(session::get_session).delete(session::invalidate_session),
        )
        .route("/session/refresh", post(session::refresh_session))
        .route("/exchange/assets", get(exchange::list_assets))
        .route("/exchange/limits/{currency}", get(exchange::get_limits))
        .route("/exchange/quotes", get(exchange::list_quotes))
        .route("/exchange/quotes/{pair}", get(exchange::get_quote))
        .route("/exchange/validate", post(exchange::validate_order))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        wallet::attach_wallet,
        wallet::get_wallet,
        wallet::detach_wallet,
        session::get_session,
        session::refresh_session,
        session::invalidate_session,
        exchange::list_assets,
        exchange::get_limits,
        exchange::list_quotes,
        exchange::get_quote,
        exchange::validate_order
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            AttachWalletRequest,
            WalletContextResponse,
            SessionStatusResponse,
            AssetInfo,
            AssetType,
            LimitsResponse,
            QuoteResponse,
            ValidateOrderRequest,
            ValidateOrderResponse,
            Fix,
            PeriodicWindow
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Wallet", description = "Wallet context the service acts for"),
        (name = "Session", description = "Session token status and refresh"),
        (name = "Exchange", description = "Assets, limits, quotes and order validation")
    )
)]
struct ApiDoc;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::service::tests::{harness, Harness};
    use crate::exchange::service::tests::{
        fake_balance, fake_limits, limits, FakeBalance, FakeLimits,
    };
    use crate::exchange::{OrderValidationService, RateFeed, TradingCapabilities};
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) async fn test_state_with(
        limits: FakeLimits,
        balance: FakeBalance,
        capabilities: TradingCapabilities,
    ) -> (Harness, AppState) {
        let h = harness(None).await;
        let orders = Arc::new(OrderValidationService::new(
            Arc::new(limits),
            Arc::new(balance),
            capabilities,
        ));
        let state = AppState::new(h.storage.clone(), h.service.clone(), orders, RateFeed::new());
        (h, state)
    }

    /// Wallet "wallet-a" attached, no periodic limits, 1 BTC in `acc-1`.
    pub(crate) async fn test_state() -> (Harness, AppState) {
        test_state_with(
            fake_limits(limits(None, None)),
            fake_balance(dec!(1)),
            TradingCapabilities::all_enabled(),
        )
        .await
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_attached_wallet() {
        let (_h, state) = test_state().await;
        let response = router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["checks"]["wallet"], "attached");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (_h, state) = test_state().await;
        let response = router(state)
            .oneshot(
                Request::get("/health/live")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let (_h, state) = test_state().await;
        let response = router(state)
            .oneshot(Request::get("/v1/session").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn wallet_context_round_trips_over_http() {
        let (_h, state) = test_state().await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(
                Request::put("/v1/wallet/context")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"wallet_id":"wallet-b","credential":"key-b"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/v1/wallet/context").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["wallet_id"], "wallet-b");
        assert!(body.get("credential").is_none());
    }

    #[tokio::test]
    async fn validate_error_uses_error_body() {
        let (_h, state) = test_state().await;
        let response = router(state)
            .oneshot(
                Request::post("/v1/exchange/validate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"pair":"BTC-BTC","fiat":"EUR","account_id":"acc-1","amount":"1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "invalid_input");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (_h, state) = test_state().await;
        let response = router(state)
            .oneshot(
                Request::get("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/v1/exchange/validate"].is_object());
    }
}
