//! Venue B: Balancer style weighted pools.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::weighted;
use crate::config::BalancerConfig;
use crate::domain::{Amount, Asset, BasisPoints, PoolRef, VenueKind};
use crate::error::{RouterError, VenueError};
use crate::ledger::Ledger;
use crate::traits::{FromConfig, SwapRequest, VenueAdapter};

/// Smallest number of tokens in a pool.
pub const MIN_TOKENS: usize = 2;
/// Largest number of tokens in a pool.
pub const MAX_TOKENS: usize = 8;
/// Smallest weight of a single token (1%).
pub const MIN_WEIGHT: BasisPoints = BasisPoints::new(100);
/// Largest swap fee (10%).
pub const MAX_SWAP_FEE: BasisPoints = BasisPoints::new(1_000);

/// A weighted pool. Balances are the pool account's ledger balances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BalancerPool {
    address: PoolRef,
    tokens: Vec<(Asset, BasisPoints)>,
    swap_fee: BasisPoints,
}

impl BalancerPool {
    /// Creates a pool from `(asset, weight)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] unless the pool holds
    /// 2 to 8 distinct tokens, each weighted at least 1%, with weights
    /// summing to 100% and a swap fee of at most 10%.
    pub fn new(
        address: PoolRef,
        tokens: Vec<(Asset, BasisPoints)>,
        swap_fee: BasisPoints,
    ) -> Result<Self, RouterError> {
        let invalid =
            |what: String| RouterError::InvalidConfiguration(format!("pool {address}: {what}"));

        if !(MIN_TOKENS..=MAX_TOKENS).contains(&tokens.len()) {
            return Err(invalid(format!(
                "{} tokens, expected {MIN_TOKENS}..={MAX_TOKENS}",
                tokens.len()
            )));
        }
        for (i, (asset, weight)) in tokens.iter().enumerate() {
            if tokens[..i].iter().any(|(other, _)| other == asset) {
                return Err(invalid(format!("token {asset} listed twice")));
            }
            if *weight < MIN_WEIGHT {
                return Err(invalid(format!("weight {weight} of {asset} below {MIN_WEIGHT}")));
            }
        }
        let total: u64 = tokens.iter().map(|(_, w)| u64::from(w.get())).sum();
        if total != u64::from(BasisPoints::MAX_PERCENT.get()) {
            return Err(invalid(format!("weights sum to {total}bp")));
        }
        if swap_fee > MAX_SWAP_FEE {
            return Err(invalid(format!("swap fee {swap_fee} above {MAX_SWAP_FEE}")));
        }
        Ok(Self {
            address,
            tokens,
            swap_fee,
        })
    }

    /// Pool account.
    #[must_use]
    pub const fn address(&self) -> PoolRef {
        self.address
    }

    /// Tokens and their weights.
    #[must_use]
    pub fn tokens(&self) -> &[(Asset, BasisPoints)] {
        &self.tokens
    }

    /// Swap fee charged on input.
    #[must_use]
    pub const fn swap_fee(&self) -> BasisPoints {
        self.swap_fee
    }

    /// Normalized weight of `asset`, if the pool holds it.
    #[must_use]
    pub fn weight_of(&self, asset: Asset) -> Option<BasisPoints> {
        self.tokens
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, w)| *w)
    }

    fn weights(&self, input: Asset, output: Asset) -> Option<(BasisPoints, BasisPoints)> {
        if input == output {
            return None;
        }
        Some((self.weight_of(input)?, self.weight_of(output)?))
    }

    /// Output of selling `amount` of `input` for `output` at current balances.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::PairMismatch`] if the pool lacks either asset,
    /// otherwise any pricing failure.
    pub fn out_given_in(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
        amount: Amount,
    ) -> Result<Amount, VenueError> {
        let (weight_in, weight_out) =
            self.weights(input, output)
                .ok_or(VenueError::PairMismatch {
                    pool: self.address,
                    input,
                    output,
                })?;
        let account = self.address.address();
        weighted::out_given_in(
            ledger.balance_of(account, input),
            weight_in,
            ledger.balance_of(account, output),
            weight_out,
            amount,
            self.swap_fee,
        )
    }
}

/// Adapter over a registry of weighted pools.
#[derive(Debug, Clone, Default)]
pub struct BalancerAdapter {
    pools: BTreeMap<PoolRef, BalancerPool>,
}

impl BalancerAdapter {
    /// Creates an adapter with no pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pool.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if the address is taken.
    pub fn add_pool(&mut self, pool: BalancerPool) -> Result<(), RouterError> {
        if self.pools.contains_key(&pool.address) {
            return Err(RouterError::InvalidConfiguration(format!(
                "pool {} registered twice",
                pool.address
            )));
        }
        self.pools.insert(pool.address, pool);
        Ok(())
    }

    /// Looks up a pool by address.
    #[must_use]
    pub fn pool(&self, pool: PoolRef) -> Option<&BalancerPool> {
        self.pools.get(&pool)
    }

    /// `getBestPoolsWithLimit(x, y, n)`: up to `limit` pools holding both
    /// assets, deepest first.
    ///
    /// Depth is [`weighted::effective_liquidity`] of the output side; ties
    /// keep address order.
    #[must_use]
    pub fn get_best_pools_with_limit(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
        limit: usize,
    ) -> Vec<PoolRef> {
        let mut ranked: Vec<(Amount, PoolRef)> = self
            .pools
            .values()
            .filter_map(|pool| {
                let (weight_in, weight_out) = pool.weights(input, output)?;
                let balance_out = ledger.balance_of(pool.address.address(), output);
                let depth = weighted::effective_liquidity(balance_out, weight_in, weight_out).ok()?;
                Some((depth, pool.address))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().take(limit).map(|(_, p)| p).collect()
    }
}

impl FromConfig<BalancerConfig> for BalancerAdapter {
    fn from_config(config: &BalancerConfig) -> Result<Self, RouterError> {
        config.validate()?;
        let mut adapter = Self::new();
        for pool in config.pools() {
            let tokens = pool
                .tokens()
                .iter()
                .map(|t| (t.asset(), t.weight()))
                .collect();
            adapter.add_pool(BalancerPool::new(pool.address(), tokens, pool.swap_fee())?)?;
        }
        Ok(adapter)
    }
}

impl VenueAdapter for BalancerAdapter {
    fn kind(&self) -> VenueKind {
        VenueKind::Balancer
    }

    fn canonical_pool(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
    ) -> Result<PoolRef, VenueError> {
        self.get_best_pools_with_limit(ledger, input, output, 1)
            .first()
            .copied()
            .ok_or(VenueError::NoPoolForPair { input, output })
    }

    fn quote(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
        amount: Amount,
    ) -> Result<Amount, VenueError> {
        let address = self.canonical_pool(ledger, input, output)?;
        let pool = self.pool(address).ok_or(VenueError::PoolNotFound(address))?;
        pool.out_given_in(ledger, input, output, amount)
    }

    fn execute(
        &self,
        ledger: &mut dyn Ledger,
        request: &SwapRequest,
    ) -> Result<Amount, VenueError> {
        let pool = self
            .pool(request.pool)
            .ok_or(VenueError::PoolNotFound(request.pool))?;
        let out = pool.out_given_in(&*ledger, request.input, request.output, request.amount_in)?;
        request.check_minimum(out)?;

        let account = pool.address.address();
        ledger.transfer(request.input, request.payer, account, request.amount_in)?;
        ledger.transfer(request.output, account, request.recipient, out)?;
        debug!(
            pool = %pool.address,
            input = %request.input,
            output = %request.output,
            amount_in = %request.amount_in,
            amount_out = %out,
            "balancer swap"
        );
        Ok(out)
    }
}
