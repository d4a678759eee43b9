//! Splitting a deposit across venues.

use core::fmt;

use alloy_primitives::Address;
use tracing::{debug, info, info_span};

use super::{FeeLedger, SettlementGuard};
use crate::domain::{
    Amount, Asset, BasisPoints, BranchFill, CallContext, Distribution, FeeConfig, SwapBranch,
    SwapReceipt,
};
use crate::error::{Result, RouterError};
use crate::ledger::Ledger;
use crate::traits::{SwapRequest, VenuePolicy};
use crate::venues::VenueRegistry;

/// Phases of one swap call.
///
/// `Idle -> Validating -> Dispatching -> Settling -> Complete`; any failure
/// moves to `Reverted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterPhase {
    /// No call in progress.
    Idle,
    /// Checking the distribution, deposit and venues.
    Validating,
    /// Paying the fee and executing each branch.
    Dispatching,
    /// Delivering outputs to the caller.
    Settling,
    /// Committed.
    Complete,
    /// Rolled back.
    Reverted,
}

impl fmt::Display for RouterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Dispatching => "dispatching",
            Self::Settling => "settling",
            Self::Complete => "complete",
            Self::Reverted => "reverted",
        };
        f.write_str(name)
    }
}

/// Routes one deposit through a set of branches.
///
/// Holds no venue-specific logic: each branch's adapter is looked up in the
/// [`VenueRegistry`] by its venue selector. The whole call runs inside a
/// [`SettlementGuard`], so any failure leaves the ledger untouched.
#[derive(Debug, Clone, Copy)]
pub struct SplitRouter<'a> {
    venues: &'a VenueRegistry,
    policy: VenuePolicy,
    engine: Address,
    deposit_asset: Asset,
}

impl<'a> SplitRouter<'a> {
    /// Creates a router acting as `engine` and accepting `deposit_asset`.
    #[must_use]
    pub const fn new(
        venues: &'a VenueRegistry,
        policy: VenuePolicy,
        engine: Address,
        deposit_asset: Asset,
    ) -> Self {
        Self {
            venues,
            policy,
            engine,
            deposit_asset,
        }
    }

    /// Venue policy of the active implementation.
    #[must_use]
    pub const fn policy(&self) -> VenuePolicy {
        self.policy
    }

    /// Builds `swap` branches from target assets and weights, routing each
    /// through the default venue's canonical pool.
    ///
    /// # Errors
    ///
    /// - [`RouterError::LengthMismatch`] if the slices differ in length.
    /// - [`RouterError::EmptyDistribution`] / [`RouterError::DistributionMismatch`]
    ///   if the weights are invalid.
    /// - [`RouterError::UnknownVenue`] if the default venue is not registered.
    /// - [`RouterError::VenueExecutionFailed`] if a target has no pool.
    pub fn branches_for(
        &self,
        ledger: &dyn Ledger,
        targets: &[Asset],
        weights: &[BasisPoints],
    ) -> Result<Vec<SwapBranch>> {
        if targets.len() != weights.len() {
            return Err(RouterError::LengthMismatch {
                targets: targets.len(),
                weights: weights.len(),
            });
        }
        Distribution::new(weights.to_vec())?;

        let venue = self.policy.default_venue();
        let adapter = self.venues.get(venue)?;
        targets
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(branch, (&target, &weight))| {
                let pool = adapter
                    .canonical_pool(ledger, self.deposit_asset, target)
                    .map_err(|reason| RouterError::VenueExecutionFailed { branch, reason })?;
                Ok(SwapBranch::new(target, pool, weight, venue))
            })
            .collect()
    }

    /// Executes a split swap.
    ///
    /// # Flow
    ///
    /// 1. **Validating**: weights sum to 10 000, deposit non-zero, every
    ///    venue permitted by the policy and registered.
    /// 2. Split the deposit into `(fee, net)` and `net` across branches.
    /// 3. **Dispatching** (inside the settlement guard): pull the deposit
    ///    from the caller, pay the fee, execute each non-empty branch in
    ///    order with the engine as payer and recipient.
    /// 4. **Settling**: deliver each fill to the caller.
    /// 5. The guard commits, or reverts everything.
    ///
    /// # Errors
    ///
    /// Input validation errors are returned before any transfer. After
    /// that, [`RouterError::VenueExecutionFailed`],
    /// [`RouterError::ResidualBalanceInvariantViolated`] and
    /// [`RouterError::Ledger`] are returned with the ledger rolled back.
    pub fn execute(
        &self,
        ledger: &mut dyn Ledger,
        fees: &FeeConfig,
        ctx: CallContext,
        branches: &[SwapBranch],
    ) -> Result<SwapReceipt> {
        let span = info_span!(
            "swap",
            caller = %ctx.caller(),
            deposit = %ctx.value(),
            branches = branches.len(),
        );
        let _enter = span.enter();

        let result = self.run(ledger, fees, ctx, branches);
        match &result {
            Ok(receipt) => {
                debug!(phase = %RouterPhase::Complete);
                info!(fee = %receipt.fee, net = %receipt.net, "swap committed");
            }
            Err(err) => debug!(phase = %RouterPhase::Reverted, error = %err),
        }
        result
    }

    fn run(
        &self,
        ledger: &mut dyn Ledger,
        fees: &FeeConfig,
        ctx: CallContext,
        branches: &[SwapBranch],
    ) -> Result<SwapReceipt> {
        debug!(phase = %RouterPhase::Validating);
        let distribution = Distribution::new(branches.iter().map(|b| b.weight).collect())?;
        let deposit = ctx.value();
        if deposit.is_zero() {
            return Err(RouterError::ZeroDeposit);
        }
        for (branch, b) in branches.iter().enumerate() {
            if !self.policy.permits(b.venue) {
                return Err(RouterError::VenueNotSupported {
                    branch,
                    venue: b.venue,
                });
            }
            self.venues.get(b.venue)?;
        }

        let (fee, net) = FeeLedger::compute_fee(deposit, fees)?;
        let amounts = distribution.allocate(net)?;

        let targets = branches.iter().map(|b| b.target);
        let guard = SettlementGuard::open(ledger, self.engine, self.deposit_asset, targets);
        let outcome = self.dispatch(ledger, fees, ctx, branches, &amounts, fee);
        let fills = guard.close(ledger, outcome)?;

        Ok(SwapReceipt {
            caller: ctx.caller(),
            deposit_asset: self.deposit_asset,
            deposit,
            fee,
            net,
            fills,
        })
    }

    fn dispatch(
        &self,
        ledger: &mut dyn Ledger,
        fees: &FeeConfig,
        ctx: CallContext,
        branches: &[SwapBranch],
        amounts: &[Amount],
        fee: Amount,
    ) -> Result<Vec<BranchFill>> {
        debug!(phase = %RouterPhase::Dispatching);
        ledger.transfer(self.deposit_asset, ctx.caller(), self.engine, ctx.value())?;
        ledger.transfer(self.deposit_asset, self.engine, fees.recipient(), fee)?;

        let mut fills = Vec::with_capacity(branches.len());
        for (index, (branch, &amount_in)) in branches.iter().zip(amounts).enumerate() {
            let amount_out = if amount_in.is_zero() {
                Amount::ZERO
            } else {
                let request = SwapRequest {
                    input: self.deposit_asset,
                    output: branch.target,
                    amount_in,
                    pool: branch.pool,
                    payer: self.engine,
                    recipient: self.engine,
                    min_amount_out: branch.min_amount_out,
                };
                self.venues
                    .get(branch.venue)?
                    .execute(ledger, &request)
                    .map_err(|reason| RouterError::VenueExecutionFailed {
                        branch: index,
                        reason,
                    })?
            };
            debug!(
                branch = index,
                %amount_in,
                %amount_out,
                target = %branch.target,
                "branch filled"
            );
            fills.push(BranchFill {
                index,
                target: branch.target,
                venue: branch.venue,
                pool: branch.pool,
                amount_in,
                amount_out,
            });
        }

        debug!(phase = %RouterPhase::Settling);
        for fill in &fills {
            ledger.transfer(fill.target, self.engine, ctx.caller(), fill.amount_out)?;
        }
        Ok(fills)
    }
}
