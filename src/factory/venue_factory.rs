//! Builds venue adapters and seeds their pools.

#[cfg(any(feature = "uniswap-v2", feature = "balancer"))]
use tracing::info;

use crate::config::VenueConfig;
use crate::error::RouterError;
use crate::ledger::Ledger;
use crate::venues::VenueRegistry;

#[cfg(any(feature = "uniswap-v2", feature = "balancer"))]
use crate::traits::FromConfig;

/// Stateless factory turning [`VenueConfig`] blueprints into a populated
/// [`VenueRegistry`].
///
/// Pool reserves are ledger balances, so building a venue also mints each
/// configured reserve into the pool's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VenueFactory;

impl VenueFactory {
    /// Builds one adapter, registers it and seeds its pools.
    ///
    /// # Flow
    ///
    /// 1. Validate the blueprint via [`VenueConfig::validate`].
    /// 2. Match on the variant and delegate to the adapter's [`FromConfig`].
    /// 3. Register the adapter.
    /// 4. Mint the configured reserves into each pool account.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidConfiguration`] if the blueprint is invalid,
    ///   the venue kind is already registered, or the venue's feature is
    ///   not enabled.
    /// - [`RouterError::Ledger`] if seeding overflows a balance.
    #[cfg_attr(
        not(any(feature = "uniswap-v2", feature = "balancer")),
        allow(unused_variables)
    )]
    pub fn install(
        config: &VenueConfig,
        registry: &mut VenueRegistry,
        ledger: &mut dyn Ledger,
    ) -> Result<(), RouterError> {
        config.validate()?;

        match config {
            #[cfg(feature = "uniswap-v2")]
            VenueConfig::UniswapV2(cfg) => {
                let adapter = crate::venues::UniswapV2Adapter::from_config(cfg)?;
                registry.register(Box::new(adapter))?;
                for pair in cfg.pairs() {
                    let account = pair.address().address();
                    ledger.mint(pair.token0(), account, pair.reserve0())?;
                    ledger.mint(pair.token1(), account, pair.reserve1())?;
                }
                info!(pairs = cfg.pairs().len(), "uniswap-v2 venue installed");
                Ok(())
            }

            #[cfg(feature = "balancer")]
            VenueConfig::Balancer(cfg) => {
                let adapter = crate::venues::BalancerAdapter::from_config(cfg)?;
                registry.register(Box::new(adapter))?;
                for pool in cfg.pools() {
                    let account = pool.address().address();
                    for token in pool.tokens() {
                        ledger.mint(token.asset(), account, token.balance())?;
                    }
                }
                info!(pools = cfg.pools().len(), "balancer venue installed");
                Ok(())
            }

            #[allow(unreachable_patterns)]
            other => Err(RouterError::InvalidConfiguration(format!(
                "venue `{}` requires its feature to be enabled",
                other.kind()
            ))),
        }
    }

    /// Builds a registry holding every configured venue.
    ///
    /// # Errors
    ///
    /// Propagates the first [`install`](Self::install) failure.
    pub fn build(
        configs: &[VenueConfig],
        ledger: &mut dyn Ledger,
    ) -> Result<VenueRegistry, RouterError> {
        let mut registry = VenueRegistry::new();
        for config in configs {
            Self::install(config, &mut registry, ledger)?;
        }
        Ok(registry)
    }
}
