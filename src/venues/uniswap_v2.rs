//! Venue A: Uniswap V2 style constant-product pairs.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use super::constant_product;
use crate::config::UniswapV2Config;
use crate::domain::{Amount, Asset, BasisPoints, PoolRef, VenueKind};
use crate::error::{RouterError, VenueError};
use crate::ledger::Ledger;
use crate::traits::{FromConfig, SwapRequest, VenueAdapter};

/// Default pair fee (0.30%).
pub const DEFAULT_PAIR_FEE: BasisPoints = BasisPoints::new(30);

/// One constant-product pair. Its reserves are the pair account's balances
/// of `token0` and `token1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UniswapV2Pair {
    address: PoolRef,
    token0: Asset,
    token1: Asset,
    fee: BasisPoints,
}

impl UniswapV2Pair {
    /// Creates a pair; tokens are stored in address order.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if the tokens are equal
    /// or the fee exceeds 100%.
    pub fn new(
        address: PoolRef,
        token_a: Asset,
        token_b: Asset,
        fee: BasisPoints,
    ) -> Result<Self, RouterError> {
        if token_a == token_b {
            return Err(RouterError::InvalidConfiguration(format!(
                "pair {address}: identical tokens"
            )));
        }
        if !fee.is_valid_percent() {
            return Err(RouterError::InvalidConfiguration(format!(
                "pair {address}: fee {fee} above 100%"
            )));
        }
        let (token0, token1) = sort_pair(token_a, token_b);
        Ok(Self {
            address,
            token0,
            token1,
            fee,
        })
    }

    /// Pair account.
    #[must_use]
    pub const fn address(&self) -> PoolRef {
        self.address
    }

    /// Lower-addressed token.
    #[must_use]
    pub const fn token0(&self) -> Asset {
        self.token0
    }

    /// Higher-addressed token.
    #[must_use]
    pub const fn token1(&self) -> Asset {
        self.token1
    }

    /// Swap fee charged on input.
    #[must_use]
    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }

    /// Returns `true` if the pair trades `input` for `output`.
    #[must_use]
    pub fn trades(&self, input: Asset, output: Asset) -> bool {
        input != output && sort_pair(input, output) == (self.token0, self.token1)
    }

    /// Current `(reserve_in, reserve_out)` for selling `input`.
    pub fn reserves(&self, ledger: &dyn Ledger, input: Asset, output: Asset) -> (Amount, Amount) {
        let account = self.address.address();
        (
            ledger.balance_of(account, input),
            ledger.balance_of(account, output),
        )
    }
}

fn sort_pair(a: Asset, b: Asset) -> (Asset, Asset) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Adapter over a set of Uniswap V2 pairs.
///
/// Mirrors the factory's `getPair`: at most one pair per unordered token
/// pair.
#[derive(Debug, Clone, Default)]
pub struct UniswapV2Adapter {
    pairs: BTreeMap<PoolRef, UniswapV2Pair>,
    by_tokens: HashMap<(Asset, Asset), PoolRef>,
}

impl UniswapV2Adapter {
    /// Creates an adapter with no pairs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pair.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if the address or the
    /// token pair is already registered.
    pub fn add_pair(&mut self, pair: UniswapV2Pair) -> Result<(), RouterError> {
        let key = (pair.token0, pair.token1);
        if self.pairs.contains_key(&pair.address) {
            return Err(RouterError::InvalidConfiguration(format!(
                "pair {} registered twice",
                pair.address
            )));
        }
        if let Some(existing) = self.by_tokens.get(&key) {
            return Err(RouterError::InvalidConfiguration(format!(
                "pair {} duplicates {existing} for {} / {}",
                pair.address, pair.token0, pair.token1
            )));
        }
        self.by_tokens.insert(key, pair.address);
        self.pairs.insert(pair.address, pair);
        Ok(())
    }

    /// `getPair(x, y)`: the pair trading `x` against `y`, in either order.
    #[must_use]
    pub fn get_pair(&self, x: Asset, y: Asset) -> Option<PoolRef> {
        self.by_tokens.get(&sort_pair(x, y)).copied()
    }

    /// Looks up a pair by address.
    #[must_use]
    pub fn pair(&self, pool: PoolRef) -> Option<&UniswapV2Pair> {
        self.pairs.get(&pool)
    }

    /// All registered pairs in address order.
    pub fn pairs(&self) -> impl Iterator<Item = &UniswapV2Pair> {
        self.pairs.values()
    }

    fn resolve(
        &self,
        pool: PoolRef,
        input: Asset,
        output: Asset,
    ) -> Result<&UniswapV2Pair, VenueError> {
        let pair = self.pair(pool).ok_or(VenueError::PoolNotFound(pool))?;
        if !pair.trades(input, output) {
            return Err(VenueError::PairMismatch {
                pool,
                input,
                output,
            });
        }
        Ok(pair)
    }
}

impl FromConfig<UniswapV2Config> for UniswapV2Adapter {
    fn from_config(config: &UniswapV2Config) -> Result<Self, RouterError> {
        config.validate()?;
        let mut adapter = Self::new();
        for pair in config.pairs() {
            adapter.add_pair(UniswapV2Pair::new(
                pair.address(),
                pair.token0(),
                pair.token1(),
                pair.fee(),
            )?)?;
        }
        Ok(adapter)
    }
}

impl VenueAdapter for UniswapV2Adapter {
    fn kind(&self) -> VenueKind {
        VenueKind::UniswapV2
    }

    fn canonical_pool(
        &self,
        _ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
    ) -> Result<PoolRef, VenueError> {
        self.get_pair(input, output)
            .ok_or(VenueError::NoPoolForPair { input, output })
    }

    fn quote(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
        amount: Amount,
    ) -> Result<Amount, VenueError> {
        let pool = self.canonical_pool(ledger, input, output)?;
        let pair = self.resolve(pool, input, output)?;
        let (reserve_in, reserve_out) = pair.reserves(ledger, input, output);
        constant_product::amount_out(amount, reserve_in, reserve_out, pair.fee)
    }

    fn execute(
        &self,
        ledger: &mut dyn Ledger,
        request: &SwapRequest,
    ) -> Result<Amount, VenueError> {
        let pair = self.resolve(request.pool, request.input, request.output)?;
        let (reserve_in, reserve_out) = pair.reserves(&*ledger, request.input, request.output);
        let out =
            constant_product::amount_out(request.amount_in, reserve_in, reserve_out, pair.fee)?;
        request.check_minimum(out)?;

        let account = pair.address.address();
        ledger.transfer(request.input, request.payer, account, request.amount_in)?;
        ledger.transfer(request.output, account, request.recipient, out)?;
        debug!(
            pool = %pair.address,
            input = %request.input,
            output = %request.output,
            amount_in = %request.amount_in,
            amount_out = %out,
            "uniswap-v2 swap"
        );
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::ledger::InMemoryLedger;

    const WETH: Asset = Asset::new(Address::repeat_byte(0xee));
    const DAI: Asset = Asset::new(Address::repeat_byte(0xda));
    const LINK: Asset = Asset::new(Address::repeat_byte(0x11));
    const PAIR: PoolRef = PoolRef::new(Address::repeat_byte(0xa1));
    const TRADER: Address = Address::repeat_byte(0x01);

    fn setup() -> (UniswapV2Adapter, InMemoryLedger) {
        let Ok(pair) = UniswapV2Pair::new(PAIR, WETH, DAI, DEFAULT_PAIR_FEE) else {
            panic!("valid pair");
        };
        let mut adapter = UniswapV2Adapter::new();
        let Ok(()) = adapter.add_pair(pair) else {
            panic!("pair registered");
        };
        let mut ledger = InMemoryLedger::new();
        for (asset, amount) in [(WETH, 1_000_000u128), (DAI, 2_000_000_000)] {
            let Ok(()) = ledger.mint(asset, PAIR.address(), Amount::new(amount)) else {
                panic!("seed");
            };
        }
        let Ok(()) = ledger.mint(WETH, TRADER, Amount::new(10_000)) else {
            panic!("fund");
        };
        (adapter, ledger)
    }

    fn request(amount: u128, pool: PoolRef, output: Asset) -> SwapRequest {
        SwapRequest {
            input: WETH,
            output,
            amount_in: Amount::new(amount),
            pool,
            payer: TRADER,
            recipient: TRADER,
            min_amount_out: None,
        }
    }

    #[test]
    fn get_pair_is_order_independent() {
        let (adapter, _) = setup();
        assert_eq!(adapter.get_pair(WETH, DAI), Some(PAIR));
        assert_eq!(adapter.get_pair(DAI, WETH), Some(PAIR));
        assert_eq!(adapter.get_pair(WETH, LINK), None);
    }

    #[test]
    fn identical_tokens_rejected() {
        assert!(UniswapV2Pair::new(PAIR, WETH, WETH, DEFAULT_PAIR_FEE).is_err());
    }

    #[test]
    fn duplicate_pair_rejected() {
        let (mut adapter, _) = setup();
        let other = PoolRef::new(Address::repeat_byte(0xa2));
        let Ok(dup) = UniswapV2Pair::new(other, DAI, WETH, DEFAULT_PAIR_FEE) else {
            panic!("valid pair");
        };
        assert!(adapter.add_pair(dup).is_err());
    }

    #[test]
    fn execute_moves_reserves() {
        let (adapter, mut ledger) = setup();
        let Ok(quoted) = adapter.quote(&ledger, WETH, DAI, Amount::new(1_000)) else {
            panic!("quote");
        };
        let Ok(out) = adapter.execute(&mut ledger, &request(1_000, PAIR, DAI)) else {
            panic!("execute");
        };
        assert_eq!(out, quoted);
        assert_eq!(ledger.balance_of(TRADER, DAI), out);
        assert_eq!(ledger.balance_of(TRADER, WETH), Amount::new(9_000));
        assert_eq!(
            ledger.balance_of(PAIR.address(), WETH),
            Amount::new(1_001_000)
        );
    }

    #[test]
    fn unknown_pool_rejected() {
        let (adapter, mut ledger) = setup();
        let bogus = PoolRef::new(Address::repeat_byte(0x99));
        assert_eq!(
            adapter.execute(&mut ledger, &request(1_000, bogus, DAI)),
            Err(VenueError::PoolNotFound(bogus))
        );
    }

    #[test]
    fn wrong_output_rejected() {
        let (adapter, mut ledger) = setup();
        assert!(matches!(
            adapter.execute(&mut ledger, &request(1_000, PAIR, LINK)),
            Err(VenueError::PairMismatch { .. })
        ));
    }

    #[test]
    fn minimum_output_enforced_without_transfer() {
        let (adapter, mut ledger) = setup();
        let req = SwapRequest {
            min_amount_out: Some(Amount::MAX),
            ..request(1_000, PAIR, DAI)
        };
        assert!(matches!(
            adapter.execute(&mut ledger, &req),
            Err(VenueError::SlippageExceeded { .. })
        ));
        assert_eq!(ledger.balance_of(TRADER, WETH), Amount::new(10_000));
    }

    #[test]
    fn overdrawn_payer_surfaces_ledger_error() {
        let (adapter, mut ledger) = setup();
        assert!(matches!(
            adapter.execute(&mut ledger, &request(50_000, PAIR, DAI)),
            Err(VenueError::Ledger(_))
        ));
    }
}
