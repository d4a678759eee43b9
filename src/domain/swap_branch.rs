//! One leg of a split swap.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Asset, BasisPoints, PoolRef, VenueKind};

/// A single branch of a split: which asset to buy, where, and with what
/// share of the net deposit.
///
/// Built per call from caller input and consumed by the router; never
/// persisted. The field names follow the `swapMultiple` call surface
/// (`token`, `pool`, `distribution`, `dex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapBranch {
    /// Asset to acquire.
    #[serde(rename = "token")]
    pub target: Asset,
    /// Pool inside the venue to trade against.
    pub pool: PoolRef,
    /// Share of the net deposit routed through this branch.
    #[serde(rename = "distribution")]
    pub weight: BasisPoints,
    /// Venue adapter executing the branch.
    #[serde(rename = "dex")]
    pub venue: VenueKind,
    /// Minimum acceptable output; a smaller fill aborts the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount_out: Option<Amount>,
}

impl SwapBranch {
    /// Creates a branch with no minimum output.
    #[must_use]
    pub const fn new(target: Asset, pool: PoolRef, weight: BasisPoints, venue: VenueKind) -> Self {
        Self {
            target,
            pool,
            weight,
            venue,
            min_amount_out: None,
        }
    }

    /// Sets the minimum acceptable output.
    #[must_use]
    pub const fn with_min_amount_out(mut self, minimum: Amount) -> Self {
        self.min_amount_out = Some(minimum);
        self
    }
}

impl fmt::Display for SwapBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of net -> {} via {}@{}",
            self.weight, self.target, self.venue, self.pool
        )
    }
}
