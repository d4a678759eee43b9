//! Protocol fee configuration and fee arithmetic.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Amount, BasisPoints, FeeConfig, Rounding};
use crate::error::{Result, RouterError};
use crate::math::CheckedArithmetic;

/// Holds the persistent [`FeeConfig`] and the initializer version gate.
///
/// The only mutators are [`initialize`](Self::initialize) and
/// [`reinitialize`](Self::reinitialize); swaps read the configuration
/// through [`config`](Self::config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeLedger {
    config: Option<FeeConfig>,
    initialized: u8,
}

impl FeeLedger {
    /// Highest accepted fee rate (100%).
    pub const MAX_RATE: BasisPoints = BasisPoints::MAX_PERCENT;

    /// Version written by [`initialize`](Self::initialize).
    pub const INITIAL_VERSION: u8 = 1;

    /// A ledger whose configuration has not been set.
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self {
            config: None,
            initialized: 0,
        }
    }

    /// Sets the fee configuration; callable once per instance.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AlreadyInitialized`] if any initializer ran before.
    /// - [`RouterError::InvalidFeeRecipient`] if `recipient` is zero.
    /// - [`RouterError::InvalidFeeRate`] if `rate` exceeds 10 000 bp.
    pub fn initialize(&mut self, recipient: Address, rate: BasisPoints) -> Result<()> {
        self.reinitialize(Self::INITIAL_VERSION, recipient, rate)
    }

    /// Rewrites the fee configuration under a higher initializer version.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AlreadyInitialized`] if `version` is not above the
    ///   stored version.
    /// - [`RouterError::InvalidFeeRecipient`] / [`RouterError::InvalidFeeRate`]
    ///   as for [`initialize`](Self::initialize).
    pub fn reinitialize(
        &mut self,
        version: u8,
        recipient: Address,
        rate: BasisPoints,
    ) -> Result<()> {
        if version <= self.initialized {
            return Err(RouterError::AlreadyInitialized);
        }
        if recipient.is_zero() {
            return Err(RouterError::InvalidFeeRecipient);
        }
        if rate > Self::MAX_RATE {
            return Err(RouterError::InvalidFeeRate {
                rate,
                max: Self::MAX_RATE,
            });
        }
        let config = FeeConfig::new(recipient, rate);
        self.config = Some(config);
        self.initialized = version;
        info!(%config, version, "fee configuration initialized");
        Ok(())
    }

    /// Current fee configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NotInitialized`] before the first initializer.
    pub fn config(&self) -> Result<FeeConfig> {
        self.config.ok_or(RouterError::NotInitialized)
    }

    /// Highest initializer version that ran (0 = never initialized).
    #[must_use]
    pub const fn initialized_version(&self) -> u8 {
        self.initialized
    }

    /// Splits `deposit` into `(fee, net)`.
    ///
    /// `fee = floor(deposit × rate / 10 000)` and `net = deposit − fee`, so
    /// `fee + net == deposit` exactly; the floor remainder stays in `net`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] only for a rate above 100%, which
    /// initialization rules out.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use split_swap::domain::{Amount, BasisPoints, FeeConfig};
    /// use split_swap::router::FeeLedger;
    ///
    /// let cfg = FeeConfig::new(Address::repeat_byte(0xfe), BasisPoints::new(10));
    /// let Ok((fee, net)) = FeeLedger::compute_fee(Amount::ONE_ETHER, &cfg) else { panic!() };
    /// assert_eq!(fee, Amount::new(1_000_000_000_000_000)); // 0.001
    /// assert_eq!(net, Amount::new(999_000_000_000_000_000));
    /// ```
    pub fn compute_fee(deposit: Amount, config: &FeeConfig) -> Result<(Amount, Amount)> {
        let fee = config.rate().apply(deposit, Rounding::Down)?;
        let net = deposit.safe_sub(&fee)?;
        Ok((fee, net))
    }
}
