//! Unified error types for the split-swap engine.
//!
//! Three layers, from the outside in:
//!
//! - [`RouterError`]: returned by every engine operation (swap, initialize,
//!   upgrade, configuration).
//! - [`VenueError`]: returned by a [`VenueAdapter`](crate::traits::VenueAdapter);
//!   the router wraps it in [`RouterError::VenueExecutionFailed`] together
//!   with the index of the branch that failed.
//! - [`LedgerError`]: returned by the value-transfer substrate.
//!
//! # Taxonomy
//!
//! | Class | Variants | Effect |
//! |-------|----------|--------|
//! | Input validation | `EmptyDistribution`, `LengthMismatch`, `DistributionMismatch`, `ZeroDeposit`, `InvalidFeeRate`, `InvalidFeeRecipient` | rejected before any transfer |
//! | External venue | `VenueExecutionFailed` | whole call rolled back |
//! | Invariant | `ResidualBalanceInvariantViolated` | whole call rolled back, logged loudly |
//! | Authorization | `UnauthorizedUpgrade`, `AlreadyInitialized`, `AdminCannotCallImplementation` | call rejected |
//!
//! No error is recovered inside the engine: every failure unwinds the whole
//! call.

use alloy_primitives::Address;
use thiserror::Error;

use crate::domain::{Amount, Asset, BasisPoints, PoolRef, SchemaVersion, VenueKind};

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, RouterError>;

/// Checked arithmetic left the representable range.
///
/// Raised by [`CheckedArithmetic`](crate::math::CheckedArithmetic); converts
/// into the `Overflow` variant of [`RouterError`] and [`VenueError`] so `?`
/// works at both layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("arithmetic overflow: {0}")]
pub struct ArithmeticError(pub &'static str);

/// Failure of a value transfer on the ledger substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The debited account does not hold enough of the asset.
    #[error("insufficient balance: {account} holds {available} of {asset}, needs {required}")]
    InsufficientBalance {
        /// Account being debited.
        account: Address,
        /// Asset being moved.
        asset: Asset,
        /// Amount requested.
        required: Amount,
        /// Amount held.
        available: Amount,
    },

    /// Crediting the account would overflow its balance.
    #[error("balance overflow crediting {account} with {asset}")]
    Overflow {
        /// Account being credited.
        account: Address,
        /// Asset being credited.
        asset: Asset,
    },
}

/// Failure reported by a liquidity venue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    /// The pool reference is not known to this venue.
    #[error("pool {0} not found")]
    PoolNotFound(PoolRef),

    /// The venue has no pool trading the requested pair.
    #[error("no pool for {input} -> {output}")]
    NoPoolForPair {
        /// Asset sold.
        input: Asset,
        /// Asset bought.
        output: Asset,
    },

    /// The pool does not hold both sides of the requested trade.
    #[error("pool {pool} does not trade {input} -> {output}")]
    PairMismatch {
        /// Pool addressed by the branch.
        pool: PoolRef,
        /// Asset sold.
        input: Asset,
        /// Asset bought.
        output: Asset,
    },

    /// Reserves cannot fill the amount.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The fill is below the branch's minimum output.
    #[error("slippage: minimum {minimum}, got {actual}")]
    SlippageExceeded {
        /// Minimum acceptable output.
        minimum: Amount,
        /// Output the venue would deliver.
        actual: Amount,
    },

    /// Zero input amount.
    #[error("swap amount must be non-zero")]
    ZeroAmount,

    /// A transfer on the ledger failed during the trade.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Pricing arithmetic overflowed.
    #[error("overflow: {0}")]
    Overflow(&'static str),
}

/// Unified error type for all engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// No branches were supplied.
    #[error("distribution is empty")]
    EmptyDistribution,

    /// `swap` received a different number of targets and weights.
    #[error("{targets} target assets but {weights} weights")]
    LengthMismatch {
        /// Number of target assets.
        targets: usize,
        /// Number of weights.
        weights: usize,
    },

    /// Weights do not sum to exactly 10 000 basis points.
    #[error("distribution sums to {total}bp, expected 10000bp")]
    DistributionMismatch {
        /// Actual sum of the weights.
        total: u64,
    },

    /// The call carried no value.
    #[error("deposit must be non-zero")]
    ZeroDeposit,

    /// The fee rate exceeds the allowed bound.
    #[error("fee rate {rate} exceeds maximum {max}")]
    InvalidFeeRate {
        /// Requested rate.
        rate: BasisPoints,
        /// Allowed maximum.
        max: BasisPoints,
    },

    /// The fee recipient is the zero address.
    #[error("fee recipient must not be the zero address")]
    InvalidFeeRecipient,

    /// `initialize` (or a reinitializer of the same or lower version) ran before.
    #[error("already initialized")]
    AlreadyInitialized,

    /// A swap reached an instance whose fee configuration was never set.
    #[error("engine not initialized")]
    NotInitialized,

    /// No adapter is registered for the venue.
    #[error("no adapter registered for venue {0}")]
    UnknownVenue(VenueKind),

    /// The active implementation does not route through this venue.
    #[error("branch {branch}: venue {venue} not supported by the active implementation")]
    VenueNotSupported {
        /// Index of the offending branch.
        branch: usize,
        /// Venue the branch asked for.
        venue: VenueKind,
    },

    /// A venue rejected one branch; the whole call is rolled back.
    #[error("branch {branch}: venue execution failed: {reason}")]
    VenueExecutionFailed {
        /// Index of the failed branch.
        branch: usize,
        /// Venue-level cause.
        reason: VenueError,
    },

    /// The engine's balance of an asset changed across a call.
    #[error("residual balance of {asset}: opened at {opening}, closed at {closing}")]
    ResidualBalanceInvariantViolated {
        /// Asset left behind or over-spent.
        asset: Asset,
        /// Engine balance before the call.
        opening: Amount,
        /// Engine balance after the call.
        closing: Amount,
    },

    /// A non-admin identity attempted an admin action.
    #[error("{caller} is not the proxy admin")]
    UnauthorizedUpgrade {
        /// Identity that attempted the action.
        caller: Address,
    },

    /// The admin identity may not reach the routing implementation.
    #[error("admin cannot call the implementation through the proxy")]
    AdminCannotCallImplementation,

    /// The reinitializer attached to an upgrade failed; the upgrade is void.
    #[error("reinitialization failed: {0}")]
    ReinitializationFailed(Box<RouterError>),

    /// The new implementation's storage schema cannot be reached from the current one.
    #[error("storage schema {current} cannot be migrated to {proposed}")]
    IncompatibleStorageLayout {
        /// Schema currently stored at the proxy.
        current: SchemaVersion,
        /// Schema the new implementation expects.
        proposed: SchemaVersion,
    },

    /// A storage migration step failed.
    #[error("migration {from} -> {to} failed: {reason}")]
    MigrationFailed {
        /// Source schema of the step.
        from: SchemaVersion,
        /// Target schema of the step.
        to: SchemaVersion,
        /// Reason reported by the step.
        reason: &'static str,
    },

    /// A venue could not price an off-engine quote.
    #[error("quote failed: {0}")]
    QuoteFailed(VenueError),

    /// A configuration blueprint is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A transfer performed by the engine itself failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Engine arithmetic overflowed.
    #[error("overflow: {0}")]
    Overflow(&'static str),
}

impl From<ArithmeticError> for VenueError {
    fn from(err: ArithmeticError) -> Self {
        Self::Overflow(err.0)
    }
}

impl From<ArithmeticError> for RouterError {
    fn from(err: ArithmeticError) -> Self {
        Self::Overflow(err.0)
    }
}

impl From<::config::ConfigError> for RouterError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_failure_names_branch_and_reason() {
        let err = RouterError::VenueExecutionFailed {
            branch: 1,
            reason: VenueError::InsufficientLiquidity,
        };
        assert_eq!(
            err.to_string(),
            "branch 1: venue execution failed: insufficient liquidity"
        );
    }

    #[test]
    fn distribution_mismatch_reports_total() {
        let err = RouterError::DistributionMismatch { total: 9_999 };
        assert!(err.to_string().contains("9999bp"));
    }

    #[test]
    fn ledger_error_converts_into_both_layers() {
        let cause = LedgerError::Overflow {
            account: Address::ZERO,
            asset: Asset::new(Address::ZERO),
        };
        assert_eq!(
            VenueError::from(cause.clone()),
            VenueError::Ledger(cause.clone())
        );
        assert_eq!(RouterError::from(cause.clone()), RouterError::Ledger(cause));
    }

    #[test]
    fn reinitialization_failure_wraps_cause() {
        let err = RouterError::ReinitializationFailed(Box::new(RouterError::AlreadyInitialized));
        assert_eq!(
            err.to_string(),
            "reinitialization failed: already initialized"
        );
    }
}
