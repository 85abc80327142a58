// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clients for the remote services the swap flow depends on.
//!
//! | Client | Backend | Endpoints |
//! |--------|---------|-----------|
//! | [`IdentityClient`] | exchange | `POST /users`, `POST /auth` |
//! | [`LimitsClient`] | exchange | `GET /trades/limits` |
//! | [`QuoteClient`] | exchange | `GET /markets/quotes/{pair}` |
//! | [`BalanceClient`] | wallet core | `GET /accounts/{id}/balance` |
//!
//! All payloads are decoded into typed records that reject unknown fields.

pub mod balance;
pub mod error;
pub mod http;
pub mod identity;
pub mod limits;
pub mod quotes;

pub use balance::BalanceClient;
pub use error::ProviderError;
pub use http::ApiHttp;
pub use identity::IdentityClient;
pub use limits::LimitsClient;
pub use quotes::QuoteClient;
