//! Checked arithmetic trait for amounts.
//!
//! [`CheckedArithmetic`] turns the `Option`-returning operations on
//! [`Amount`] into `Result`s carrying an [`ArithmeticError`], so pricing and
//! routing code can use `?` throughout.
//!
//! # Examples
//!
//! ```
//! use split_swap::domain::Amount;
//! use split_swap::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! let b = Amount::new(200);
//! assert_eq!(a.safe_add(&b), Ok(Amount::new(300)));
//! assert!(a.safe_sub(&b).is_err());
//! ```

use crate::domain::{Amount, Rounding};
use crate::error::ArithmeticError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics**: every error condition produces `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError`] if the result exceeds the representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, ArithmeticError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, ArithmeticError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError`] if the result exceeds the representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, ArithmeticError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, ArithmeticError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, ArithmeticError> {
        self.checked_add(other)
            .ok_or(ArithmeticError("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, ArithmeticError> {
        self.checked_sub(other)
            .ok_or(ArithmeticError("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, ArithmeticError> {
        self.checked_mul(other)
            .ok_or(ArithmeticError("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, ArithmeticError> {
        self.checked_div(other, rounding)
            .ok_or(ArithmeticError("division by zero"))
    }
}
