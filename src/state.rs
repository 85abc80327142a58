// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthenticationService;
use crate::exchange::{OrderValidationService, RateFeed};
use crate::storage::FileStorage;

/// Shared handles passed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub auth: Arc<AuthenticationService>,
    pub orders: Arc<OrderValidationService>,
    pub rates: RateFeed,
}

impl AppState {
    pub fn new(
        storage: Arc<FileStorage>,
        auth: Arc<AuthenticationService>,
        orders: Arc<OrderValidationService>,
        rates: RateFeed,
    ) -> Self {
        Self {
            storage,
            auth,
            orders,
            rates,
        }
    }
}
