// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use relational_swap_server::{
    api::router,
    auth::{AuthenticationService, IdentityProvisioner, SystemClock},
    config::ServiceConfig,
    exchange::{OrderValidationService, RateFeed, RatePoller},
    logging::{self, LogFormat},
    providers::{ApiHttp, BalanceClient, IdentityClient, LimitsClient, QuoteClient},
    state::AppState,
    storage::{FileStorage, StoragePaths},
};

type StartupResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogFormat::default());
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    logging::init(config.log_format);

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: ServiceConfig) -> StartupResult<()> {
    let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
    storage.initialize()?;
    let storage = Arc::new(storage);
    info!(data_dir = %config.data_dir.display(), "Storage initialized");

    let exchange_http = ApiHttp::new(&config.exchange_api_base_url, config.http_timeout)?;
    let wallet_http = ApiHttp::new(&config.wallet_api_base_url, config.http_timeout)?;

    let identity = Arc::new(IdentityClient::new(exchange_http.clone()));
    let provisioner = Arc::new(IdentityProvisioner::new(storage.clone(), identity.clone()));
    let auth = Arc::new(AuthenticationService::new(
        provisioner,
        identity,
        Arc::new(SystemClock),
    ));

    match &config.wallet {
        Some(wallet) => auth.attach_wallet(wallet).await?,
        None => {
            if auth.provisioner().wallet_id().await?.is_none() {
                warn!("No wallet attached; exchange endpoints return 409 until one is");
            }
        }
    }

    let orders = Arc::new(OrderValidationService::new(
        Arc::new(LimitsClient::new(exchange_http.clone(), auth.clone())),
        Arc::new(BalanceClient::new(wallet_http)),
        config.capabilities.clone(),
    ));

    let rates = RateFeed::new();
    let shutdown = CancellationToken::new();
    let poller = RatePoller::new(
        Arc::new(QuoteClient::new(exchange_http)),
        rates.clone(),
        config.rate_markets.clone(),
    )
    .with_interval(config.rate_poll_interval);
    let poller_handle = tokio::spawn(poller.run(shutdown.clone()));

    let state = AppState::new(storage, auth, orders, rates);
    let app = router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "Listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = poller_handle.await {
        warn!(error = %e, "Rate poller task ended abnormally");
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        }
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
