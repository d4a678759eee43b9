//! Validated split of a deposit across branches.

use super::{Amount, BasisPoints, Rounding};
use crate::error::RouterError;

/// Ordered branch weights in basis points, summing to exactly 10 000.
///
/// # Allocation policy
///
/// Every branch but the last receives `floor(net × weight / 10 000)`. The
/// last branch receives `net − Σ previous`, so the floor-division
/// remainder (at most `n − 1` base units) is swept into it and
/// `Σ allocations == net` holds for every input.
///
/// # Examples
///
/// ```
/// use split_swap::domain::{Amount, BasisPoints, Distribution};
///
/// let weights = vec![BasisPoints::new(3_000), BasisPoints::new(7_000)];
/// let Ok(d) = Distribution::new(weights) else { panic!("weights sum to 10 000") };
/// let Ok(parts) = d.allocate(Amount::new(999)) else { panic!("allocation fits") };
/// assert_eq!(parts, vec![Amount::new(299), Amount::new(700)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Distribution {
    weights: Vec<BasisPoints>,
}

impl Distribution {
    /// Validates and wraps a weight vector.
    ///
    /// # Errors
    ///
    /// - [`RouterError::EmptyDistribution`] if `weights` is empty.
    /// - [`RouterError::DistributionMismatch`] if the weights do not sum to
    ///   exactly 10 000.
    pub fn new(weights: Vec<BasisPoints>) -> Result<Self, RouterError> {
        if weights.is_empty() {
            return Err(RouterError::EmptyDistribution);
        }
        let total: u64 = weights.iter().map(|w| u64::from(w.get())).sum();
        if total != u64::from(BasisPoints::MAX_PERCENT.get()) {
            return Err(RouterError::DistributionMismatch { total });
        }
        Ok(Self { weights })
    }

    /// Returns the weights in branch order.
    #[must_use]
    pub fn weights(&self) -> &[BasisPoints] {
        &self.weights
    }

    /// Number of branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`: construction rejects empty distributions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Splits `net` across the branches.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Overflow`] if the allocations exceed `net`,
    /// which the floor rounding rules out.
    pub fn allocate(&self, net: Amount) -> Result<Vec<Amount>, RouterError> {
        let mut parts = Vec::with_capacity(self.weights.len());
        let mut allocated = Amount::ZERO;
        let last = self.weights.len().saturating_sub(1);

        for (i, weight) in self.weights.iter().enumerate() {
            let part = if i == last {
                net.checked_sub(&allocated)
                    .ok_or(RouterError::Overflow("branch allocations exceed net amount"))?
            } else {
                weight.apply(net, Rounding::Down)?
            };
            allocated = allocated
                .checked_add(&part)
                .ok_or(RouterError::Overflow("branch allocation sum overflow"))?;
            parts.push(part);
        }
        Ok(parts)
    }
}
