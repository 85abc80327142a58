// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account balances from the wallet core.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ProviderError;
use super::http::ApiHttp;
use crate::exchange::{AccountBalance, AccountId, AssetType, BalanceSource};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BalanceResponse {
    account_id: String,
    asset: String,
    balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct BalanceClient {
    http: ApiHttp,
}

impl BalanceClient {
    pub fn new(http: ApiHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl BalanceSource for BalanceClient {
    async fn fetch_balance(&self, account: &AccountId) -> Result<AccountBalance, ProviderError> {
        let response: BalanceResponse = self
            .http
            .get_json(&["accounts", account.as_str(), "balance"], &[], None)
            .await?;

        if response.account_id != account.as_str() {
            return Err(ProviderError::InvalidResponse(format!(
                "balance returned for account {}, requested {account}",
                response.account_id
            )));
        }
        let asset = AssetType::from_code(&response.asset).ok_or_else(|| {
            ProviderError::InvalidResponse(format!("unknown asset `{}`", response.asset))
        })?;
        if response.balance < Decimal::ZERO {
            return Err(ProviderError::InvalidResponse(
                "balance must not be negative".to_string(),
            ));
        }

        Ok(AccountBalance {
            account_id: account.clone(),
            asset,
            balance: response.balance,
        })
    }
}
