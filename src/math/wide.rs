//! 256-bit intermediates for products of two amounts.
//!
//! Reserve × amount routinely exceeds `u128`, so pricing formulas form the
//! product in [`U256`] and only narrow the final quotient.

use alloy_primitives::U256;

use crate::domain::{Amount, Rounding};
use crate::error::ArithmeticError;

/// Computes `a × b / denominator` without intermediate overflow.
///
/// # Errors
///
/// Returns [`ArithmeticError`] when `denominator` is zero or the quotient
/// does not fit in an [`Amount`].
///
/// # Examples
///
/// ```
/// use split_swap::domain::{Amount, Rounding};
/// use split_swap::math::mul_div;
///
/// let big = Amount::new(u128::MAX);
/// assert_eq!(mul_div(big, big, big, Rounding::Down), Ok(big));
/// assert_eq!(
///     mul_div(Amount::new(10), Amount::new(1), Amount::new(3), Rounding::Up),
///     Ok(Amount::new(4)),
/// );
/// ```
pub fn mul_div(
    a: Amount,
    b: Amount,
    denominator: Amount,
    rounding: Rounding,
) -> Result<Amount, ArithmeticError> {
    if denominator.is_zero() {
        return Err(ArithmeticError("division by zero"));
    }
    let product = widen(a) * widen(b);
    let denom = widen(denominator);
    let (mut quotient, remainder) = product.div_rem(denom);
    if rounding.is_up() && !remainder.is_zero() {
        quotient += U256::from(1u8);
    }
    narrow(quotient)
}

/// Lifts an amount into 256 bits.
#[inline]
pub fn widen(amount: Amount) -> U256 {
    U256::from(amount.get())
}

/// Narrows a 256-bit value back into an amount.
///
/// # Errors
///
/// Returns [`ArithmeticError`] if `value` exceeds `u128::MAX`.
#[inline]
pub fn narrow(value: U256) -> Result<Amount, ArithmeticError> {
    u128::try_from(value)
        .map(Amount::new)
        .map_err(|_| ArithmeticError("result exceeds amount range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_beyond_u128_is_fine() {
        let a = Amount::new(u128::MAX / 2);
        let Ok(out) = mul_div(a, Amount::new(4), Amount::new(8), Rounding::Down) else {
            panic!("mul_div failed");
        };
        assert_eq!(out, Amount::new(u128::MAX / 4));
    }

    #[test]
    fn quotient_beyond_u128_is_error() {
        assert!(mul_div(Amount::MAX, Amount::new(2), Amount::new(1), Rounding::Down).is_err());
    }

    #[test]
    fn zero_denominator_is_error() {
        assert!(mul_div(Amount::new(1), Amount::new(1), Amount::ZERO, Rounding::Up).is_err());
    }

    #[test]
    fn rounding_up_only_on_remainder() {
        assert_eq!(
            mul_div(Amount::new(6), Amount::new(2), Amount::new(3), Rounding::Up),
            Ok(Amount::new(4))
        );
        assert_eq!(
            mul_div(Amount::new(7), Amount::new(2), Amount::new(3), Rounding::Up),
            Ok(Amount::new(5))
        );
    }
}
