//! Constant-product pricing (`x × y = k`).
//!
//! Fees are deducted from the input **before** the pricing formula:
//!
//! 1. `fee = ceil(amount_in × fee_bps / 10 000)`
//! 2. `net = amount_in − fee`
//! 3. `amount_out = floor(reserve_out × net / (reserve_in + net))`
//!
//! The fee stays in the pool, so `k` never decreases across a trade.

use crate::domain::{Amount, BasisPoints, Rounding};
use crate::error::VenueError;
use crate::math::{mul_div, CheckedArithmetic};

/// Input left for pricing after the pool fee, rounded against the trader.
///
/// # Errors
///
/// - [`VenueError::ZeroAmount`] if `amount_in` is zero.
/// - [`VenueError::InsufficientLiquidity`] if the fee consumes the whole input.
pub fn net_of_fee(amount_in: Amount, fee: BasisPoints) -> Result<Amount, VenueError> {
    if amount_in.is_zero() {
        return Err(VenueError::ZeroAmount);
    }
    let fee_amount = fee
        .apply(amount_in, Rounding::Up)
        .map_err(|_| VenueError::Overflow("fee calculation overflow"))?;
    let net = amount_in.safe_sub(&fee_amount)?;
    if net.is_zero() {
        return Err(VenueError::InsufficientLiquidity);
    }
    Ok(net)
}

/// Output of selling `amount_in` into a `reserve_in`/`reserve_out` pool.
///
/// # Errors
///
/// - [`VenueError::ZeroAmount`] if `amount_in` is zero.
/// - [`VenueError::InsufficientLiquidity`] if either reserve is empty or the
///   output rounds to zero.
/// - [`VenueError::Overflow`] if `reserve_in + net` exceeds the amount range.
///
/// # Examples
///
/// ```
/// use split_swap::domain::{Amount, BasisPoints};
/// use split_swap::venues::constant_product::amount_out;
///
/// // 1 000 into a 1 000 000 / 1 000 000 pool at 30 bp.
/// let Ok(out) = amount_out(
///     Amount::new(1_000),
///     Amount::new(1_000_000),
///     Amount::new(1_000_000),
///     BasisPoints::new(30),
/// ) else { panic!() };
/// assert_eq!(out, Amount::new(996));
/// ```
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: BasisPoints,
) -> Result<Amount, VenueError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(VenueError::InsufficientLiquidity);
    }
    let net = net_of_fee(amount_in, fee)?;
    let denominator = reserve_in.safe_add(&net)?;
    let out = mul_div(reserve_out, net, denominator, Rounding::Down)?;

    // out < reserve_out always holds since reserve_in > 0.
    if out.is_zero() || out >= reserve_out {
        return Err(VenueError::InsufficientLiquidity);
    }
    Ok(out)
}
