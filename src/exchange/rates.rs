// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Rate Feed
//!
//! Latest quote per market, fanned out to subscribers.
//!
//! ## Subscriptions
//!
//! Each subscription owns one task that runs its callbacks in delivery
//! order, so `on_value` and `on_error` never run concurrently with each
//! other. [`Subscription::cancel`] (or dropping the handle) stops delivery.
//! A new subscriber immediately receives the latest known quote.
//!
//! ## Polling
//!
//! [`RatePoller`] fetches every configured market on a fixed interval and
//! publishes the result. It stops when its `CancellationToken` is cancelled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{FiatMarket, Quote};
use crate::providers::ProviderError;

/// Default interval between polling sweeps.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Remote quote lookup.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_quote(&self, market: &FiatMarket) -> Result<Quote, ProviderError>;
}

/// A failed quote update, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateFeedError {
    pub market: FiatMarket,
    pub message: String,
}

#[derive(Debug, Clone)]
enum RateEvent {
    Value(Quote),
    Error(RateFeedError),
}

struct Subscriber {
    market: FiatMarket,
    sender: mpsc::UnboundedSender<RateEvent>,
}

#[derive(Default)]
struct FeedInner {
    latest: RwLock<HashMap<FiatMarket, Quote>>,
    subscribers: Mutex<Vec<Subscriber>>,
}

/// Shared handle to the rate feed.
#[derive(Clone, Default)]
pub struct RateFeed {
    inner: Arc<FeedInner>,
}

/// Handle to an active subscription. Dropping it cancels delivery.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl RateFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest quote for `market`, if one was ever published.
    pub fn latest(&self, market: &FiatMarket) -> Option<Quote> {
        let latest = self.inner.latest.read().ok()?;
        latest.get(market).cloned()
    }

    /// Every market with a known quote.
    pub fn snapshot(&self) -> Vec<Quote> {
        self.inner
            .latest
            .read()
            .map(|latest| latest.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Record `quote` and deliver it to subscribers of its market.
    ///
    /// A quote older than the one already held is ignored. The subscriber
    /// list stays locked across the update so a concurrent `subscribe` sees
    /// either the old quote followed by this one, or this one.
    pub fn publish(&self, quote: Quote) {
        let Ok(mut subscribers) = self.inner.subscribers.lock() else {
            return;
        };
        if let Ok(mut latest) = self.inner.latest.write() {
            if let Some(current) = latest.get(&quote.market) {
                if current.timestamp > quote.timestamp {
                    debug!(market = %quote.market, "Ignoring out-of-date quote");
                    return;
                }
            }
            latest.insert(quote.market.clone(), quote.clone());
        }
        let market = quote.market.clone();
        dispatch(&mut subscribers, &market, RateEvent::Value(quote));
    }

    /// Deliver a failed update to subscribers of `market`.
    pub fn publish_error(&self, market: &FiatMarket, message: impl Into<String>) {
        let error = RateFeedError {
            market: market.clone(),
            message: message.into(),
        };
        if let Ok(mut subscribers) = self.inner.subscribers.lock() {
            dispatch(&mut subscribers, market, RateEvent::Error(error));
        }
    }

    /// Subscribe to updates for `market`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<V, E>(
        &self,
        market: FiatMarket,
        mut on_value: V,
        mut on_error: E,
    ) -> Subscription
    where
        V: FnMut(Quote) + Send + 'static,
        E: FnMut(RateFeedError) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        // Lock order is subscribers, then latest, as in `publish`.
        if let Ok(mut subscribers) = self.inner.subscribers.lock() {
            if let Some(quote) = self.latest(&market) {
                let _ = sender.send(RateEvent::Value(quote));
            }
            subscribers.push(Subscriber {
                market: market.clone(),
                sender,
            });
        }

        let cancelled = token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    event = receiver.recv() => match event {
                        Some(RateEvent::Value(quote)) => on_value(quote),
                        Some(RateEvent::Error(error)) => on_error(error),
                        None => break,
                    },
                }
            }
            debug!(market = %market, "Rate subscription ended");
        });

        Subscription { token }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .map(|s| s.iter().filter(|s| !s.sender.is_closed()).count())
            .unwrap_or(0)
    }
}

fn dispatch(subscribers: &mut Vec<Subscriber>, market: &FiatMarket, event: RateEvent) {
    subscribers.retain(|s| {
        if &s.market != market {
            return !s.sender.is_closed();
        }
        s.sender.send(event.clone()).is_ok()
    });
}

/// Background quote poller.
pub struct RatePoller {
    source: Arc<dyn RateSource>,
    feed: RateFeed,
    markets: Vec<FiatMarket>,
    poll_interval: Duration,
}

impl RatePoller {
    pub fn new(source: Arc<dyn RateSource>, feed: RateFeed, markets: Vec<FiatMarket>) -> Self {
        Self {
            source,
            feed,
            markets,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the poller loop until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(poller.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            markets = self.markets.len(),
            "Rate poller starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Rate poller shutting down");
                return;
            }

            self.poll_step().await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Rate poller shutting down");
                    return;
                }
            }
        }
    }

    /// Fetch every market once and publish the results.
    async fn poll_step(&self) {
        for market in &self.markets {
            match self.source.fetch_quote(market).await {
                Ok(quote) => {
                    debug!(market = %market, price = %quote.price, "Rate poller: fetched quote");
                    self.feed.publish(quote);
                }
                Err(e) => {
                    warn!(market = %market, error = %e, "Rate poller: failed to fetch quote");
                    self.feed.publish_error(market, e.to_string());
                }
            }
        }
    }
}
