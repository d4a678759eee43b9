//! Outcome of a committed split swap.

use core::fmt;

use alloy_primitives::Address;
use serde::Serialize;

use super::{Amount, Asset, PoolRef, VenueKind};

/// What one branch spent and delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BranchFill {
    /// Position of the branch in the call.
    pub index: usize,
    /// Asset delivered to the caller.
    pub target: Asset,
    /// Venue that executed the branch.
    pub venue: VenueKind,
    /// Pool traded against.
    pub pool: PoolRef,
    /// Share of the net deposit sold.
    pub amount_in: Amount,
    /// Amount of `target` delivered.
    pub amount_out: Amount,
}

impl BranchFill {
    /// `true` when the branch was allocated nothing and not dispatched.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.amount_in.is_zero()
    }
}

/// Aggregate result of a `swap` / `swap_multiple` call.
///
/// # Invariant
///
/// `fee + Σ fills.amount_in == deposit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SwapReceipt {
    /// Caller the outputs were delivered to.
    pub caller: Address,
    /// Asset deposited.
    pub deposit_asset: Asset,
    /// Amount deposited.
    pub deposit: Amount,
    /// Protocol fee paid to the fee recipient.
    pub fee: Amount,
    /// Deposit left after the fee, split across the branches.
    pub net: Amount,
    /// Per-branch fills in call order.
    pub fills: Vec<BranchFill>,
}

impl SwapReceipt {
    /// Total amount sold across all branches.
    #[must_use]
    pub fn total_in(&self) -> Option<Amount> {
        Amount::checked_sum(self.fills.iter().map(|f| &f.amount_in))
    }

    /// Amount of `asset` delivered across all branches.
    #[must_use]
    pub fn delivered(&self, asset: Asset) -> Option<Amount> {
        Amount::checked_sum(
            self.fills
                .iter()
                .filter(|f| f.target == asset)
                .map(|f| &f.amount_out),
        )
    }
}

impl fmt::Display for SwapReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "deposit {} of {} (fee {}, net {})",
            self.deposit, self.deposit_asset, self.fee, self.net
        )?;
        for fill in &self.fills {
            writeln!(
                f,
                "  [{}] {} -> {} {} via {}@{}",
                fill.index, fill.amount_in, fill.amount_out, fill.target, fill.venue, fill.pool
            )?;
        }
        Ok(())
    }
}
