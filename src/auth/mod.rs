// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session tokens for the exchange backend, bound to the attached wallet.
//!
//! ## Token Flow
//!
//! 1. A wallet context (wallet id + recovery credential) is attached
//! 2. On first use the wallet is signed up once, yielding a `user_id` and a
//!    lifetime token that are persisted under `identities/`
//! 3. The lifetime token is exchanged for short-lived session tokens
//! 4. Session tokens are cached in memory and reused until 30 seconds before
//!    expiry, or until invalidated
//!
//! ## Security
//!
//! - Session tokens are never written to disk
//! - Credentials and bearers are held in `SecretString` and redacted in `Debug`
//! - A token is only reused for the user it was issued to

pub mod cache;
pub mod error;
pub mod provisioning;
pub mod service;
pub mod token;

pub use cache::{IssuanceTicket, SessionTokenCache};
pub use error::AuthError;
pub use provisioning::{
    IdentityProvisioner, ProvisionedIdentity, SignupApi, SignupResult, WalletContext,
};
pub use service::{AuthenticationService, SessionStatus, TokenIssuer};
pub use token::{Clock, ManualClock, SessionToken, SystemClock, EXPIRY_SLACK};
