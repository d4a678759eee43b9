//! Uniform interface over an external liquidity venue.

use core::fmt;

use alloy_primitives::Address;

use crate::domain::{Amount, Asset, PoolRef, VenueKind};
use crate::error::VenueError;
use crate::ledger::Ledger;

/// A fully resolved exchange request handed to [`VenueAdapter::execute`].
///
/// The adapter pulls `amount_in` of `input` from `payer` into `pool` and
/// pays the output from `pool` to `recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    /// Asset sold.
    pub input: Asset,
    /// Asset bought.
    pub output: Asset,
    /// Amount of `input` sold.
    pub amount_in: Amount,
    /// Pool to trade against.
    pub pool: PoolRef,
    /// Account paying the input.
    pub payer: Address,
    /// Account receiving the output.
    pub recipient: Address,
    /// Smallest acceptable output.
    pub min_amount_out: Option<Amount>,
}

impl SwapRequest {
    /// Checks `amount_out` against the request's minimum.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::SlippageExceeded`] when the fill is too small.
    pub fn check_minimum(&self, amount_out: Amount) -> Result<(), VenueError> {
        match self.min_amount_out {
            Some(minimum) if amount_out < minimum => Err(VenueError::SlippageExceeded {
                minimum,
                actual: amount_out,
            }),
            _ => Ok(()),
        }
    }
}

/// Capability set of one venue family.
///
/// The router holds no venue-specific logic: it looks the adapter up by
/// [`VenueKind`] and calls [`execute`](Self::execute). Adding a venue means
/// adding an implementation of this trait.
///
/// # Contract
///
/// - `execute` moves exactly `amount_in` from the payer, or fails without
///   any transfer.
/// - Quotes read the ledger but never write it.
/// - Implementations are immutable; all pool state lives in the ledger.
pub trait VenueAdapter: fmt::Debug + Send + Sync {
    /// Venue family this adapter serves.
    fn kind(&self) -> VenueKind;

    /// Pool this venue's own router would use for `input -> output`.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::NoPoolForPair`] if no pool trades the pair.
    fn canonical_pool(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
    ) -> Result<PoolRef, VenueError>;

    /// Expected output of selling `amount` of `input` through the canonical pool.
    ///
    /// # Errors
    ///
    /// Same failures as [`canonical_pool`](Self::canonical_pool) plus any
    /// pricing failure of the pool.
    fn quote(
        &self,
        ledger: &dyn Ledger,
        input: Asset,
        output: Asset,
        amount: Amount,
    ) -> Result<Amount, VenueError>;

    /// Performs the exchange against `request.pool`.
    ///
    /// # Errors
    ///
    /// - [`VenueError::PoolNotFound`] if the pool is unknown to this venue.
    /// - [`VenueError::PairMismatch`] if the pool does not trade the pair.
    /// - [`VenueError::InsufficientLiquidity`] if reserves cannot fill it.
    /// - [`VenueError::SlippageExceeded`] if the output is below the minimum.
    /// - [`VenueError::Ledger`] if a transfer fails.
    fn execute(&self, ledger: &mut dyn Ledger, request: &SwapRequest)
        -> Result<Amount, VenueError>;
}
