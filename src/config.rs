// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for wallet context and identities | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `EXCHANGE_API_BASE_URL` | Identity, limits and quotes backend | Required |
//! | `WALLET_API_BASE_URL` | Wallet core balance service | Required |
//! | `HTTP_TIMEOUT_SECS` | Outbound HTTP timeout | `15` |
//! | `PAUSED_ASSETS` | Comma separated asset codes disabled for trading | empty |
//! | `RATE_PAIRS` | Comma separated markets polled for quotes | `BTC-EUR,ETH-EUR` |
//! | `RATE_POLL_INTERVAL_SECS` | Quote poll interval | `10` |
//! | `WALLET_ID` | Wallet context attached at startup | Optional |
//! | `WALLET_CREDENTIAL` | Recovery credential for `WALLET_ID` | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::WalletContext;
use crate::exchange::{FiatMarket, TradingCapabilities};
use crate::logging::LogFormat;
use crate::storage::paths::DATA_ROOT;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const EXCHANGE_API_BASE_URL_ENV: &str = "EXCHANGE_API_BASE_URL";
pub const WALLET_API_BASE_URL_ENV: &str = "WALLET_API_BASE_URL";
pub const HTTP_TIMEOUT_SECS_ENV: &str = "HTTP_TIMEOUT_SECS";
pub const PAUSED_ASSETS_ENV: &str = "PAUSED_ASSETS";
pub const RATE_PAIRS_ENV: &str = "RATE_PAIRS";
pub const RATE_POLL_INTERVAL_SECS_ENV: &str = "RATE_POLL_INTERVAL_SECS";
pub const WALLET_ID_ENV: &str = "WALLET_ID";
pub const WALLET_CREDENTIAL_ENV: &str = "WALLET_CREDENTIAL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_RATE_PAIRS: &str = "BTC-EUR,ETH-EUR";
const DEFAULT_RATE_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Fully resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub exchange_api_base_url: String,
    pub wallet_api_base_url: String,
    pub http_timeout: Duration,
    pub capabilities: TradingCapabilities,
    pub rate_markets: Vec<FiatMarket>,
    pub rate_poll_interval: Duration,
    pub wallet: Option<WalletContext>,
    pub log_format: LogFormat,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let port = match env.optional(PORT_ENV) {
            Some(raw) => parse_number(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let http_timeout_secs = match env.optional(HTTP_TIMEOUT_SECS_ENV) {
            Some(raw) => parse_number(HTTP_TIMEOUT_SECS_ENV, &raw)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        let poll_secs: u64 = match env.optional(RATE_POLL_INTERVAL_SECS_ENV) {
            Some(raw) => parse_number(RATE_POLL_INTERVAL_SECS_ENV, &raw)?,
            None => DEFAULT_RATE_POLL_INTERVAL_SECS,
        };
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                var: RATE_POLL_INTERVAL_SECS_ENV,
                reason: "must be at least 1".to_string(),
            });
        }

        let capabilities = TradingCapabilities::from_paused_codes(
            &env.or_default(PAUSED_ASSETS_ENV, ""),
        )
        .map_err(|e| ConfigError::Invalid {
            var: PAUSED_ASSETS_ENV,
            reason: e.to_string(),
        })?;

        let rate_markets = env
            .or_default(RATE_PAIRS_ENV, DEFAULT_RATE_PAIRS)
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<FiatMarket>().map_err(|e| ConfigError::Invalid {
                    var: RATE_PAIRS_ENV,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let wallet = match (env.optional(WALLET_ID_ENV), env.optional(WALLET_CREDENTIAL_ENV)) {
            (Some(id), Some(credential)) => Some(WalletContext::new(id, credential)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(WALLET_CREDENTIAL_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(WALLET_ID_ENV)),
        };

        let log_format = env
            .or_default(LOG_FORMAT_ENV, "pretty")
            .parse::<LogFormat>()
            .map_err(|reason| ConfigError::Invalid {
                var: LOG_FORMAT_ENV,
                reason,
            })?;

        Ok(Self {
            data_dir: PathBuf::from(env.or_default(DATA_DIR_ENV, DATA_ROOT)),
            host: env.or_default(HOST_ENV, DEFAULT_HOST),
            port,
            exchange_api_base_url: env.required(EXCHANGE_API_BASE_URL_ENV)?,
            wallet_api_base_url: env.required(WALLET_API_BASE_URL_ENV)?,
            http_timeout: Duration::from_secs(http_timeout_secs),
            capabilities,
            rate_markets,
            rate_poll_interval: Duration::from_secs(poll_secs),
            wallet,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
