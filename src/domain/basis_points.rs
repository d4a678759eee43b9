//! Basis-point representation for weights and fee rates.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::RouterError;

/// Value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A proportion expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for both distribution weights and the protocol fee rate. All `u32`
/// values are representable; [`is_valid_percent`](Self::is_valid_percent)
/// reports whether the value lies in `0..=10_000`.
///
/// # Examples
///
/// ```
/// use split_swap::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(10); // 0.1%
/// let Ok(cut) = fee.apply(Amount::new(1_000_000), Rounding::Down) else { panic!() };
/// assert_eq!(cut, Amount::new(1_000));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns the complementary share, `10_000 - self`, or `None` above 100%.
    #[must_use]
    pub const fn complement(&self) -> Option<Self> {
        match MAX_BPS.checked_sub(self.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `amount × self / 10_000` with explicit rounding.
    ///
    /// The amount is split as `q × 10_000 + r` so the product is formed as
    /// `q × bps + r × bps / 10_000`; no intermediate exceeds the result plus
    /// `10_000 × bps`, so any amount can be weighted by a percentage without
    /// overflow.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] only when `self` exceeds 100% and
    /// the scaled result does not fit in `u128`.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let bps = self.0 as u128;
        let divisor = MAX_BPS as u128;
        let q = amount.get() / divisor;
        let r = amount.get() % divisor;

        let whole = match q.checked_mul(bps) {
            Some(v) => v,
            None => return Err(RouterError::Overflow("basis points apply overflow")),
        };
        // r < 10_000 and bps <= u32::MAX, so r * bps fits comfortably.
        let part = r * bps;
        let carry = part / divisor;
        let rest = part % divisor;

        let floor = match whole.checked_add(carry) {
            Some(v) => v,
            None => return Err(RouterError::Overflow("basis points apply overflow")),
        };
        match rounding {
            Rounding::Down => Ok(Amount::new(floor)),
            Rounding::Up if rest != 0 => match floor.checked_add(1) {
                Some(v) => Ok(Amount::new(v)),
                None => Err(RouterError::Overflow("basis points apply overflow")),
            },
            Rounding::Up => Ok(Amount::new(floor)),
        }
    }
}

impl From<u32> for BasisPoints {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
