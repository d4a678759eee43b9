//! Core trait abstractions.
//!
//! - [`VenueAdapter`]: uniform execute/quote contract over a liquidity venue.
//! - [`RouterLogic`]: a routing implementation the proxy can activate.
//! - [`FromConfig`]: configuration-driven construction.

mod from_config;
mod router_logic;
mod venue_adapter;

pub use from_config::FromConfig;
pub use router_logic::{ImplementationId, ProxyFrame, RouterLogic, VenuePolicy};
pub use venue_adapter::{SwapRequest, VenueAdapter};
