//! Construction of venue adapters from declarative configuration.
//!
//! Each adapter implements `FromConfig<C>` for its own configuration
//! struct, so the [`VenueFactory`](crate::factory::VenueFactory) can
//! dispatch construction on the [`VenueConfig`](crate::config::VenueConfig)
//! variant:
//!
//! ```text
//! VenueConfig::UniswapV2(cfg) => UniswapV2Adapter::from_config(&cfg)
//! VenueConfig::Balancer(cfg)  => BalancerAdapter::from_config(&cfg)
//! ```
//!
//! There is no blanket implementation: every adapter-config pairing is
//! explicit.

use crate::error::RouterError;

/// Builds a value from a validated configuration blueprint.
///
/// Implementations **must** validate every configuration invariant; a
/// successfully constructed adapter knows only well-formed pools.
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if any parameter is out
    /// of range or inconsistent.
    fn from_config(config: &C) -> Result<Self, RouterError>
    where
        Self: Sized;
}
