// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Swap Server - Session Tokens & Trade Limit Validation
//!
//! Backs the wallet swap flow: keeps an identity-bound session token for the
//! exchange backend and classifies orders against balance and tier limits
//! using live quotes.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Identity provisioning and the session token cache
//! - `exchange` - Order validation, rate feed and the create-swap interactor
//! - `providers` - HTTP clients for the exchange backend and wallet core
//! - `storage` - Durable wallet context and identity files

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;
