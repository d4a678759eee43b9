//! Configuration blueprints for the liquidity venues.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Asset, BasisPoints, PoolRef, VenueKind};
use crate::error::RouterError;

fn default_pair_fee() -> BasisPoints {
    BasisPoints::new(30)
}

fn default_swap_fee() -> BasisPoints {
    BasisPoints::new(30)
}

fn invalid(message: String) -> RouterError {
    RouterError::InvalidConfiguration(message)
}

/// Declarative blueprint for one venue.
///
/// Internally tagged by `kind`:
///
/// ```toml
/// [[venues]]
/// kind = "uniswap-v2"
/// [[venues.pairs]]
/// address = "0x..."
/// token0 = "0x..."
/// token1 = "0x..."
/// reserve0 = "1000000000000000000000"
/// reserve1 = "3000000000000000000000000"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VenueConfig {
    /// Constant-product pairs (Venue A).
    UniswapV2(UniswapV2Config),
    /// Weighted pools (Venue B).
    Balancer(BalancerConfig),
}

impl VenueConfig {
    /// Venue selector this blueprint configures.
    #[must_use]
    pub const fn kind(&self) -> VenueKind {
        match self {
            Self::UniswapV2(_) => VenueKind::UniswapV2,
            Self::Balancer(_) => VenueKind::Balancer,
        }
    }

    /// Validates the inner blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] on the first violation.
    pub fn validate(&self) -> Result<(), RouterError> {
        match self {
            Self::UniswapV2(cfg) => cfg.validate(),
            Self::Balancer(cfg) => cfg.validate(),
        }
    }
}

/// One constant-product pair and its initial reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniswapV2PairConfig {
    address: PoolRef,
    token0: Asset,
    token1: Asset,
    #[serde(default = "default_pair_fee", rename = "fee_bps")]
    fee: BasisPoints,
    reserve0: Amount,
    reserve1: Amount,
}

impl UniswapV2PairConfig {
    /// Creates a pair blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if the tokens are equal,
    /// the fee exceeds 100%, or either reserve is zero.
    pub fn new(
        address: PoolRef,
        token0: Asset,
        token1: Asset,
        fee: BasisPoints,
        reserve0: Amount,
        reserve1: Amount,
    ) -> Result<Self, RouterError> {
        let config = Self {
            address,
            token0,
            token1,
            fee,
            reserve0,
            reserve1,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all invariants.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.token0 == self.token1 {
            return Err(invalid(format!("pair {}: identical tokens", self.address)));
        }
        if !self.fee.is_valid_percent() {
            return Err(invalid(format!("pair {}: fee {} above 100%", self.address, self.fee)));
        }
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(invalid(format!("pair {}: zero reserve", self.address)));
        }
        Ok(())
    }

    /// Pair account.
    #[must_use]
    pub const fn address(&self) -> PoolRef {
        self.address
    }

    /// First token.
    #[must_use]
    pub const fn token0(&self) -> Asset {
        self.token0
    }

    /// Second token.
    #[must_use]
    pub const fn token1(&self) -> Asset {
        self.token1
    }

    /// Pair fee.
    #[must_use]
    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }

    /// Initial reserve of `token0`.
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// Initial reserve of `token1`.
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }
}

/// Venue A blueprint: a set of pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniswapV2Config {
    #[serde(default)]
    pairs: Vec<UniswapV2PairConfig>,
}

impl UniswapV2Config {
    /// Creates a validated blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if any pair is invalid.
    pub fn new(pairs: Vec<UniswapV2PairConfig>) -> Result<Self, RouterError> {
        let config = Self { pairs };
        config.validate()?;
        Ok(config)
    }

    /// Validates every pair.
    ///
    /// # Errors
    ///
    /// Returns the first pair's error.
    pub fn validate(&self) -> Result<(), RouterError> {
        self.pairs.iter().try_for_each(UniswapV2PairConfig::validate)
    }

    /// Configured pairs.
    #[must_use]
    pub fn pairs(&self) -> &[UniswapV2PairConfig] {
        &self.pairs
    }
}

/// One token of a weighted pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerTokenConfig {
    asset: Asset,
    #[serde(rename = "weight_bps")]
    weight: BasisPoints,
    balance: Amount,
}

impl BalancerTokenConfig {
    /// Creates a token entry.
    pub const fn new(asset: Asset, weight: BasisPoints, balance: Amount) -> Self {
        Self {
            asset,
            weight,
            balance,
        }
    }

    /// Token asset.
    #[must_use]
    pub const fn asset(&self) -> Asset {
        self.asset
    }

    /// Normalized weight.
    #[must_use]
    pub const fn weight(&self) -> BasisPoints {
        self.weight
    }

    /// Initial pool balance.
    pub const fn balance(&self) -> Amount {
        self.balance
    }
}

/// One weighted pool and its initial balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerPoolConfig {
    address: PoolRef,
    tokens: Vec<BalancerTokenConfig>,
    #[serde(default = "default_swap_fee", rename = "swap_fee_bps")]
    swap_fee: BasisPoints,
}

impl BalancerPoolConfig {
    /// Creates a pool blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if fewer than two tokens
    /// are listed, the weights do not sum to 100%, a balance is zero, or the
    /// fee exceeds 100%.
    pub fn new(
        address: PoolRef,
        tokens: Vec<BalancerTokenConfig>,
        swap_fee: BasisPoints,
    ) -> Result<Self, RouterError> {
        let config = Self {
            address,
            tokens,
            swap_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all invariants.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.tokens.len() < 2 {
            return Err(invalid(format!("pool {}: needs at least two tokens", self.address)));
        }
        let total: u64 = self.tokens.iter().map(|t| u64::from(t.weight.get())).sum();
        if total != u64::from(BasisPoints::MAX_PERCENT.get()) {
            return Err(invalid(format!(
                "pool {}: weights sum to {total}bp",
                self.address
            )));
        }
        if let Some(empty) = self.tokens.iter().find(|t| t.balance.is_zero()) {
            return Err(invalid(format!(
                "pool {}: zero balance of {}",
                self.address, empty.asset
            )));
        }
        if !self.swap_fee.is_valid_percent() {
            return Err(invalid(format!(
                "pool {}: fee {} above 100%",
                self.address, self.swap_fee
            )));
        }
        Ok(())
    }

    /// Pool account.
    #[must_use]
    pub const fn address(&self) -> PoolRef {
        self.address
    }

    /// Tokens with weights and balances.
    #[must_use]
    pub fn tokens(&self) -> &[BalancerTokenConfig] {
        &self.tokens
    }

    /// Swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> BasisPoints {
        self.swap_fee
    }
}

/// Venue B blueprint: a registry of weighted pools.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalancerConfig {
    #[serde(default)]
    pools: Vec<BalancerPoolConfig>,
}

impl BalancerConfig {
    /// Creates a validated blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if any pool is invalid.
    pub fn new(pools: Vec<BalancerPoolConfig>) -> Result<Self, RouterError> {
        let config = Self { pools };
        config.validate()?;
        Ok(config)
    }

    /// Validates every pool.
    ///
    /// # Errors
    ///
    /// Returns the first pool's error.
    pub fn validate(&self) -> Result<(), RouterError> {
        self.pools.iter().try_for_each(BalancerPoolConfig::validate)
    }

    /// Configured pools.
    #[must_use]
    pub fn pools(&self) -> &[BalancerPoolConfig] {
        &self.pools
    }
}
