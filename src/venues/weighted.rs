//! Weighted-pool pricing (Balancer style).
//!
//! For a pool holding `Bi` of the input at weight `Wi` and `Bo` of the
//! output at weight `Wo`, selling `net` (after the swap fee) yields
//!
//! ```text
//! out = Bo × (1 − (Bi / (Bi + net)) ^ (Wi / Wo))
//! ```
//!
//! The power is evaluated in 18-decimal fixed point: the integer part of
//! the exponent by repeated multiplication, the fractional part bit by bit
//! from successive square roots. Every step rounds the ratio up, so the
//! output is a lower bound of the exact value. Equal weights take the
//! exact constant-product path.

use alloy_primitives::U256;

use super::constant_product::net_of_fee;
use crate::domain::{Amount, BasisPoints, Rounding};
use crate::error::VenueError;
use crate::math::{mul_div, narrow, widen, CheckedArithmetic};

/// Fixed-point scale (1.0).
const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Fractional exponent bits evaluated before truncation.
const FRACTION_BITS: u32 = 64;

/// Largest input accepted, as a share of the input balance (30%).
pub const MAX_IN_RATIO: BasisPoints = BasisPoints::new(3_000);

/// Output of selling `amount_in` through a weighted pool.
///
/// # Errors
///
/// - [`VenueError::ZeroAmount`] if `amount_in` is zero.
/// - [`VenueError::InsufficientLiquidity`] if a balance is empty, the input
///   exceeds [`MAX_IN_RATIO`] of the input balance, or the output rounds
///   to zero.
/// - [`VenueError::Overflow`] if an intermediate leaves the amount range.
pub fn out_given_in(
    balance_in: Amount,
    weight_in: BasisPoints,
    balance_out: Amount,
    weight_out: BasisPoints,
    amount_in: Amount,
    swap_fee: BasisPoints,
) -> Result<Amount, VenueError> {
    if balance_in.is_zero() || balance_out.is_zero() {
        return Err(VenueError::InsufficientLiquidity);
    }
    if weight_in.get() == 0 || weight_out.get() == 0 {
        return Err(VenueError::InsufficientLiquidity);
    }
    let max_in = MAX_IN_RATIO
        .apply(balance_in, Rounding::Down)
        .map_err(|_| VenueError::Overflow("max-in ratio overflow"))?;
    if amount_in > max_in {
        return Err(VenueError::InsufficientLiquidity);
    }

    let net = net_of_fee(amount_in, swap_fee)?;
    let denominator = balance_in.safe_add(&net)?;

    let out = if weight_in == weight_out {
        mul_div(balance_out, net, denominator, Rounding::Down)?
    } else {
        let ratio = pow_ratio_up(balance_in, denominator, weight_in.get(), weight_out.get());
        let complement = ONE.saturating_sub(ratio);
        narrow(widen(balance_out) * complement / ONE)?
    };

    if out.is_zero() || out >= balance_out {
        return Err(VenueError::InsufficientLiquidity);
    }
    Ok(out)
}

/// Depth of the output side as seen from the input side:
/// `balance_out × Wi / (Wi + Wo)`.
///
/// Used to rank pools for a pair, best first.
///
/// # Errors
///
/// Returns [`VenueError::Overflow`] if both weights are zero.
pub fn effective_liquidity(
    balance_out: Amount,
    weight_in: BasisPoints,
    weight_out: BasisPoints,
) -> Result<Amount, VenueError> {
    let total = u128::from(weight_in.get()) + u128::from(weight_out.get());
    Ok(mul_div(
        balance_out,
        Amount::new(u128::from(weight_in.get())),
        Amount::new(total),
        Rounding::Down,
    )?)
}

/// `(num / den) ^ (exp_num / exp_den)` in fixed point, rounded up and
/// capped at [`ONE`]. Requires `num <= den` and `exp_den > 0`.
fn pow_ratio_up(num: Amount, den: Amount, exp_num: u32, exp_den: u32) -> U256 {
    let den = widen(den);
    let base = div_up(widen(num) * ONE, den).min(ONE);

    let mut result = ONE;
    for _ in 0..exp_num / exp_den {
        result = mul_up(result, base);
    }

    let mut remainder = u64::from(exp_num % exp_den);
    let exp_den = u64::from(exp_den);
    let mut root = base;
    for _ in 0..FRACTION_BITS {
        if remainder == 0 {
            break;
        }
        root = sqrt_up(root * ONE);
        remainder *= 2;
        if remainder >= exp_den {
            remainder -= exp_den;
            result = mul_up(result, root);
        }
    }
    result.min(ONE)
}

fn mul_up(a: U256, b: U256) -> U256 {
    div_up(a * b, ONE)
}

fn div_up(numerator: U256, denominator: U256) -> U256 {
    let (q, r) = numerator.div_rem(denominator);
    if r.is_zero() {
        q
    } else {
        q + U256::from(1u8)
    }
}

/// Integer square root (Newton), rounded up.
fn sqrt_up(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    let two = U256::from(2u8);
    let mut x = n;
    let mut y = (x + U256::from(1u8)) / two;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    if x * x < n {
        x + U256::from(1u8)
    } else {
        x
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::venues::constant_product;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn bp(v: u32) -> BasisPoints {
        BasisPoints::new(v)
    }

    #[test]
    fn sqrt_rounds_up() {
        assert_eq!(sqrt_up(U256::from(16u8)), U256::from(4u8));
        assert_eq!(sqrt_up(U256::from(17u8)), U256::from(5u8));
        assert_eq!(sqrt_up(U256::from(1u8)), U256::from(1u8));
    }

    #[test]
    fn integer_exponent_is_exact() {
        // (1/2)^2 = 0.25
        let r = pow_ratio_up(Amount::new(1), Amount::new(2), 2, 1);
        assert_eq!(r, ONE / U256::from(4u8));
    }

    #[test]
    fn half_exponent_is_square_root() {
        // (1/4)^(1/2) = 0.5
        let r = pow_ratio_up(Amount::new(1), Amount::new(4), 1, 2);
        assert_eq!(r, ONE / U256::from(2u8));
    }

    #[test]
    fn equal_weights_match_constant_product() {
        let (b_in, b_out, a) = (
            Amount::new(1_000 * E18),
            Amount::new(3_000 * E18),
            Amount::new(E18),
        );
        let Ok(weighted) = out_given_in(b_in, bp(5_000), b_out, bp(5_000), a, bp(30)) else {
            panic!("fills");
        };
        let Ok(cp) = constant_product::amount_out(a, b_in, b_out, bp(30)) else {
            panic!("fills");
        };
        assert_eq!(weighted, cp);
    }

    #[test]
    fn eighty_twenty_close_to_closed_form() {
        let b = 1_000 * E18;
        let a = 10 * E18;
        let Ok(out) = out_given_in(
            Amount::new(b),
            bp(8_000),
            Amount::new(b),
            bp(2_000),
            Amount::new(a),
            BasisPoints::ZERO,
        ) else {
            panic!("fills");
        };
        let expected = b as f64 * (1.0 - (b as f64 / (b + a) as f64).powf(4.0));
        let got = out.get() as f64;
        assert!(((got - expected) / expected).abs() < 1e-9, "{got} vs {expected}");
    }

    #[test]
    fn fractional_exponent_close_to_closed_form() {
        // Wi / Wo = 3 / 7
        let b_in = 500 * E18;
        let b_out = 2_000 * E18;
        let a = 25 * E18;
        let Ok(out) = out_given_in(
            Amount::new(b_in),
            bp(3_000),
            Amount::new(b_out),
            bp(7_000),
            Amount::new(a),
            BasisPoints::ZERO,
        ) else {
            panic!("fills");
        };
        let expected =
            b_out as f64 * (1.0 - (b_in as f64 / (b_in + a) as f64).powf(3.0 / 7.0));
        let got = out.get() as f64;
        assert!(((got - expected) / expected).abs() < 1e-9, "{got} vs {expected}");
    }

    #[test]
    fn larger_input_buys_more() {
        let quote = |a: u128| {
            out_given_in(
                Amount::new(1_000 * E18),
                bp(2_000),
                Amount::new(1_000 * E18),
                bp(8_000),
                Amount::new(a),
                bp(30),
            )
        };
        let (Ok(small), Ok(large)) = (quote(E18), quote(2 * E18)) else {
            panic!("fills");
        };
        assert!(large > small);
    }

    #[test]
    fn max_in_ratio_enforced() {
        let result = out_given_in(
            Amount::new(1_000),
            bp(5_000),
            Amount::new(1_000),
            bp(5_000),
            Amount::new(301),
            BasisPoints::ZERO,
        );
        assert_eq!(result, Err(VenueError::InsufficientLiquidity));
    }

    #[test]
    fn effective_liquidity_weights_output_balance() {
        assert_eq!(
            effective_liquidity(Amount::new(1_000), bp(2_000), bp(8_000)),
            Ok(Amount::new(200))
        );
    }
}
