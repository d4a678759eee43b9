//! Venue construction from configuration.
//!
//! [`VenueFactory`] dispatches on the [`VenueConfig`](crate::config::VenueConfig)
//! variant and seeds pool reserves on the ledger.

mod venue_factory;

pub use venue_factory::VenueFactory;
