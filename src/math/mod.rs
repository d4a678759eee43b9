//! Arithmetic utilities for pricing and fee calculations.
//!
//! - [`CheckedArithmetic`]: overflow-safe operations on [`Amount`](crate::domain::Amount).
//! - [`mul_div`]: `a × b / c` with a 256-bit intermediate.
//!
//! Division always takes an explicit [`Rounding`](crate::domain::Rounding);
//! the convention is to round against the trader (outputs down, required
//! inputs up).

mod checked;
mod wide;

pub use checked::CheckedArithmetic;
pub use wide::{mul_div, narrow, widen};
