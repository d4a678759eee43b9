//! Top-level engine configuration and its loader.

use std::path::Path;

use alloy_primitives::Address;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::VenueConfig;
use crate::domain::{Amount, Asset, BasisPoints, FeeConfig};
use crate::error::RouterError;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "split-swap";

/// Prefix of environment overrides (`SPLIT_SWAP__FEE_RATE_BPS=25`).
pub const ENV_PREFIX: &str = "SPLIT_SWAP";

fn default_fee_rate() -> BasisPoints {
    BasisPoints::new(10)
}

/// An account funded at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account address.
    pub address: Address,
    /// Asset credited.
    pub asset: Asset,
    /// Initial balance.
    pub balance: Amount,
}

/// Everything needed to stand up an engine deployment.
///
/// # Example
///
/// ```toml
/// engine = "0x5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e"
/// admin = "0xadadadadadadadadadadadadadadadadadadadad"
/// fee_recipient = "0xfefefefefefefefefefefefefefefefefefefefe"
/// fee_rate_bps = 10
/// deposit_asset = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Proxy address: the engine's own ledger account.
    pub engine: Address,
    /// Deployer, holder of upgrade authority.
    pub admin: Address,
    /// Receiver of the protocol fee.
    pub fee_recipient: Address,
    /// Protocol fee rate.
    #[serde(default = "default_fee_rate")]
    pub fee_rate_bps: BasisPoints,
    /// Asset accepted as deposit.
    pub deposit_asset: Asset,
    /// Accounts funded at deployment.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Venues and their pools.
    #[serde(default)]
    pub venues: Vec<VenueConfig>,
}

impl EngineConfig {
    /// Loads configuration from `.env`, a TOML file and the environment.
    ///
    /// Sources in increasing precedence:
    ///
    /// 1. `path` if given (required), else `split-swap.toml` if present;
    /// 2. `SPLIT_SWAP__*` environment variables (after `.env` is read).
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if a source cannot be
    /// read or parsed, or the result fails [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self, RouterError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            engine = %config.engine,
            venues = config.venues.len(),
            accounts = config.accounts.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] on parse or validation
    /// failure.
    pub fn from_toml_str(source: &str) -> Result<Self, RouterError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if:
    /// - the engine, admin or fee recipient is the zero address;
    /// - the engine address coincides with the admin or fee recipient;
    /// - the fee rate exceeds 100%;
    /// - two venues configure the same venue kind;
    /// - a venue blueprint is invalid.
    pub fn validate(&self) -> Result<(), RouterError> {
        let invalid = |msg: &str| Err(RouterError::InvalidConfiguration(msg.to_string()));

        if self.engine.is_zero() {
            return invalid("engine address must not be zero");
        }
        if self.admin.is_zero() {
            return invalid("admin address must not be zero");
        }
        if self.fee_recipient.is_zero() {
            return invalid("fee recipient must not be zero");
        }
        if self.engine == self.admin || self.engine == self.fee_recipient {
            return invalid("engine address must differ from admin and fee recipient");
        }
        if !self.fee_rate_bps.is_valid_percent() {
            return invalid("fee rate above 10000bp");
        }
        for (i, venue) in self.venues.iter().enumerate() {
            if self.venues[..i].iter().any(|v| v.kind() == venue.kind()) {
                return Err(RouterError::InvalidConfiguration(format!(
                    "venue {} configured twice",
                    venue.kind()
                )));
            }
            venue.validate()?;
        }
        Ok(())
    }

    /// Fee configuration written by `initialize`.
    #[must_use]
    pub const fn fee_config(&self) -> FeeConfig {
        FeeConfig::new(self.fee_recipient, self.fee_rate_bps)
    }
}
