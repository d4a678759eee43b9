//! Feature-gated venue adapters.
//!
//! | Venue | Selector | Feature | Adapter |
//! |-------|----------|---------|---------|
//! | Venue A | `uniswap-v2` (0) | `uniswap-v2` | [`UniswapV2Adapter`] |
//! | Venue B | `balancer` (1) | `balancer` | [`BalancerAdapter`] |
//!
//! Pricing math lives next to the adapters: [`constant_product`] for
//! pairs, [`weighted`] for weighted pools.

#[cfg(feature = "balancer")]
pub mod balancer;
pub mod constant_product;
mod registry;
#[cfg(feature = "uniswap-v2")]
pub mod uniswap_v2;
#[cfg(feature = "balancer")]
pub mod weighted;

#[cfg(feature = "balancer")]
pub use balancer::{BalancerAdapter, BalancerPool};
pub use registry::VenueRegistry;
#[cfg(feature = "uniswap-v2")]
pub use uniswap_v2::{UniswapV2Adapter, UniswapV2Pair};
