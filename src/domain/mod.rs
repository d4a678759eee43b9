//! Domain value types used throughout the engine.
//!
//! Amounts, basis points, identifiers, the per-call branch and distribution
//! types, and the receipt returned by a committed swap. Types with
//! invariants validate them in their constructors.

mod amount;
mod asset;
mod basis_points;
mod call_context;
mod distribution;
mod fee_config;
mod receipt;
mod rounding;
mod schema_version;
mod swap_branch;
mod venue_kind;

pub use amount::Amount;
pub use asset::{Asset, PoolRef};
pub use basis_points::BasisPoints;
pub use call_context::CallContext;
pub use distribution::Distribution;
pub use fee_config::FeeConfig;
pub use receipt::{BranchFill, SwapReceipt};
pub use rounding::Rounding;
pub use schema_version::SchemaVersion;
pub use swap_branch::SwapBranch;
pub use venue_kind::VenueKind;
