//! Deployment interface: stands up a ledger, the venues and a proxy with
//! the first implementation active, and drives upgrades.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::info;

use crate::config::EngineConfig;
use crate::domain::{
    Amount, Asset, BasisPoints, CallContext, PoolRef, SwapBranch, SwapReceipt, VenueKind,
};
use crate::error::{Result, RouterError};
use crate::factory::VenueFactory;
use crate::ledger::{InMemoryLedger, Ledger};
use crate::proxy::{Proxy, Reinitializer};
use crate::router::{SwapperV1, SwapperV2};
use crate::traits::RouterLogic;
use crate::venues::VenueRegistry;

/// A running engine: ledger, venue adapters and the proxy in front of the
/// active implementation.
#[derive(Debug)]
pub struct Deployment {
    ledger: InMemoryLedger,
    venues: VenueRegistry,
    proxy: Proxy,
}

/// Builds a [`Deployment`] from configuration.
///
/// # Flow
///
/// 1. Validate the configuration.
/// 2. Fund the configured accounts.
/// 3. Build every venue and seed its pool reserves.
/// 4. Deploy the proxy with [`SwapperV1`] active and run `initialize`
///    with the configured fee recipient and rate in the same step.
///
/// # Errors
///
/// - [`RouterError::InvalidConfiguration`] for an invalid configuration.
/// - [`RouterError::Ledger`] if funding overflows a balance.
/// - Any fee validation error from the initializer.
pub fn deploy(config: &EngineConfig) -> Result<Deployment> {
    config.validate()?;

    let mut ledger = InMemoryLedger::new();
    for account in &config.accounts {
        ledger.mint(account.asset, account.address, account.balance)?;
    }
    let venues = VenueFactory::build(&config.venues, &mut ledger)?;
    let proxy = Proxy::deploy(
        config.engine,
        config.admin,
        config.deposit_asset,
        Arc::new(SwapperV1),
        config.fee_config(),
    )?;

    info!(
        engine = %config.engine,
        implementation = %proxy.implementation(),
        venues = ?venues.kinds().collect::<Vec<_>>(),
        "engine deployed"
    );
    Ok(Deployment {
        ledger,
        venues,
        proxy,
    })
}

impl Deployment {
    /// Upgrades to [`SwapperV2`] without a reinitializer.
    ///
    /// # Errors
    ///
    /// See [`Proxy::upgrade`].
    pub fn upgrade_to_v2(&mut self, caller: Address) -> Result<()> {
        self.proxy.upgrade(caller, Arc::new(SwapperV2), None)
    }

    /// Upgrades to an arbitrary implementation.
    ///
    /// # Errors
    ///
    /// See [`Proxy::upgrade`].
    pub fn upgrade(
        &mut self,
        caller: Address,
        implementation: Arc<dyn RouterLogic>,
        reinit: Option<Reinitializer>,
    ) -> Result<()> {
        self.proxy.upgrade(caller, implementation, reinit)
    }

    /// Calls `initialize` through the proxy.
    ///
    /// # Errors
    ///
    /// See [`Proxy::initialize`]; after [`deploy`] this is always
    /// [`RouterError::AlreadyInitialized`] for a non-admin caller.
    pub fn initialize(
        &mut self,
        caller: Address,
        fee_recipient: Address,
        fee_rate: BasisPoints,
    ) -> Result<()> {
        self.proxy.initialize(caller, fee_recipient, fee_rate)
    }

    /// `swap(targets, weights)` through the proxy.
    ///
    /// # Errors
    ///
    /// See [`Proxy::swap`].
    pub fn swap(
        &mut self,
        ctx: CallContext,
        targets: &[Asset],
        weights: &[BasisPoints],
    ) -> Result<SwapReceipt> {
        self.proxy.swap(&mut self.ledger, &self.venues, ctx, targets, weights)
    }

    /// `swapMultiple(branches)` through the proxy.
    ///
    /// # Errors
    ///
    /// See [`Proxy::swap_multiple`].
    pub fn swap_multiple(
        &mut self,
        ctx: CallContext,
        branches: &[SwapBranch],
    ) -> Result<SwapReceipt> {
        self.proxy.swap_multiple(&mut self.ledger, &self.venues, ctx, branches)
    }

    /// Expected output of selling `amount` of `input` on `venue`.
    ///
    /// Reads the ledger only; used to pre-select pools and weights before
    /// a call.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownVenue`] if the venue is not deployed.
    /// - [`RouterError::QuoteFailed`] if the venue cannot price the trade.
    pub fn quote(
        &self,
        venue: VenueKind,
        input: Asset,
        output: Asset,
        amount: Amount,
    ) -> Result<Amount> {
        self.venues
            .get(venue)?
            .quote(&self.ledger, input, output, amount)
            .map_err(RouterError::QuoteFailed)
    }

    /// Pool `venue` would route `input -> output` through.
    ///
    /// # Errors
    ///
    /// As [`quote`](Self::quote).
    pub fn canonical_pool(&self, venue: VenueKind, input: Asset, output: Asset) -> Result<PoolRef> {
        self.venues
            .get(venue)?
            .canonical_pool(&self.ledger, input, output)
            .map_err(RouterError::QuoteFailed)
    }

    /// Ledger balance of `asset` held by `account`.
    #[must_use]
    pub fn balance_of(&self, account: Address, asset: Asset) -> Amount {
        self.ledger.balance_of(account, asset)
    }

    /// Credits `amount` of `asset` to `account`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Ledger`] on balance overflow.
    pub fn fund(&mut self, account: Address, asset: Asset, amount: Amount) -> Result<()> {
        self.ledger.mint(asset, account, amount)?;
        Ok(())
    }

    /// The proxy.
    #[must_use]
    pub const fn proxy(&self) -> &Proxy {
        &self.proxy
    }

    /// Deployed venues.
    #[must_use]
    pub const fn venues(&self) -> &VenueRegistry {
        &self.venues
    }

    /// Mutable access to the venues, e.g. to register an additional adapter.
    pub fn venues_mut(&mut self) -> &mut VenueRegistry {
        &mut self.venues
    }

    /// The ledger.
    #[must_use]
    pub const fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
#[cfg(feature = "uniswap-v2")]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
engine = "0x5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e"
admin = "0xadadadadadadadadadadadadadadadadadadadad"
fee_recipient = "0xfefefefefefefefefefefefefefefefefefefefe"
fee_rate_bps = 10
deposit_asset = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"

[[accounts]]
address = "0x0101010101010101010101010101010101010101"
asset = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
balance = "10000000000000000000"

[[venues]]
kind = "uniswap-v2"

[[venues.pairs]]
address = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1"
token0 = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
token1 = "0xdadadadadadadadadadadadadadadadadadadada"
reserve0 = "100000000000000000000"
reserve1 = "200000000000000000000000"
"#;

    const USER: Address = Address::repeat_byte(0x01);
    const WETH: Asset = Asset::new(Address::repeat_byte(0xee));
    const DAI: Asset = Asset::new(Address::repeat_byte(0xda));

    fn deployed() -> Deployment {
        let Ok(config) = EngineConfig::from_toml_str(CONFIG) else {
            panic!("config parses");
        };
        let Ok(deployment) = deploy(&config) else {
            panic!("deploys");
        };
        deployment
    }

    #[test]
    fn deploy_funds_accounts_and_initializes() {
        let deployment = deployed();
        assert_eq!(
            deployment.balance_of(USER, WETH),
            Amount::new(10_000_000_000_000_000_000)
        );
        assert_eq!(deployment.proxy().implementation(), SwapperV1.id());
        let Ok(fees) = deployment.proxy().fee_config() else {
            panic!("initialized at deploy");
        };
        assert_eq!(fees.rate(), BasisPoints::new(10));
    }

    #[test]
    fn quote_matches_swap_output() {
        let mut deployment = deployed();
        let Ok(fees) = deployment.proxy().fee_config() else {
            panic!("initialized");
        };
        let Ok((_, net)) = crate::router::FeeLedger::compute_fee(Amount::ONE_ETHER, &fees) else {
            panic!("fee");
        };
        let Ok(quoted) = deployment.quote(VenueKind::UniswapV2, WETH, DAI, net) else {
            panic!("quote");
        };
        let Ok(receipt) = deployment.swap(
            CallContext::new(USER, Amount::ONE_ETHER),
            &[DAI],
            &[BasisPoints::MAX_PERCENT],
        ) else {
            panic!("swap");
        };
        assert_eq!(receipt.fills[0].amount_out, quoted);
        assert_eq!(deployment.balance_of(USER, DAI), quoted);
    }

    #[test]
    fn quote_on_missing_venue() {
        let deployment = deployed();
        assert_eq!(
            deployment.quote(VenueKind::Balancer, WETH, DAI, Amount::ONE_ETHER),
            Err(RouterError::UnknownVenue(VenueKind::Balancer))
        );
    }
}
