//! Declarative configuration blueprints.
//!
//! [`EngineConfig`] is the top-level blueprint of a deployment; each
//! [`VenueConfig`] variant describes one venue and its pools. Every
//! blueprint exposes `validate()` and a validating constructor.

mod engine_config;
mod venue_config;

pub use engine_config::{AccountConfig, EngineConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use venue_config::{
    BalancerConfig, BalancerPoolConfig, BalancerTokenConfig, UniswapV2Config, UniswapV2PairConfig,
    VenueConfig,
};
