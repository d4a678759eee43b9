//! Persistent protocol fee configuration.

use core::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::BasisPoints;

/// Protocol fee rate and the account that receives it.
///
/// Lives in proxy storage. Written only by `initialize` or an authorized
/// reinitializer; every swap reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeConfig {
    recipient: Address,
    rate: BasisPoints,
}

impl FeeConfig {
    /// Creates a fee configuration. Bounds are enforced by
    /// [`FeeLedger`](crate::router::FeeLedger), not here.
    #[must_use]
    pub const fn new(recipient: Address, rate: BasisPoints) -> Self {
        Self { recipient, rate }
    }

    /// Account credited with the fee.
    #[must_use]
    pub const fn recipient(&self) -> Address {
        self.recipient
    }

    /// Fee rate applied to each deposit.
    #[must_use]
    pub const fn rate(&self) -> BasisPoints {
        self.rate
    }
}

impl fmt::Display for FeeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeConfig({} to {})", self.rate, self.recipient)
    }
}
