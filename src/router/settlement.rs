//! All-or-nothing settlement around a swap.

use alloy_primitives::Address;
use tracing::{debug, error, warn};

use crate::domain::{Amount, Asset};
use crate::error::{Result, RouterError};
use crate::ledger::{Checkpoint, Ledger};

/// Wraps one swap in a ledger transaction and checks the engine ends it
/// holding none of the deposit asset.
///
/// [`open`](Self::open) opens a checkpoint and records the engine's balance
/// of every target asset. [`close`](Self::close) commits only when the call
/// succeeded, the engine's deposit-asset balance is exactly zero, and every
/// target balance is back at its opening value. Otherwise it reverts every
/// transfer made since `open`.
#[derive(Debug)]
#[must_use = "a settlement guard must be closed"]
pub struct SettlementGuard {
    checkpoint: Checkpoint,
    engine: Address,
    deposit: (Asset, Amount),
    openings: Vec<(Asset, Amount)>,
}

impl SettlementGuard {
    /// Opens a transaction and snapshots the engine's balances.
    ///
    /// Target assets equal to `deposit_asset` or repeated are recorded once.
    pub fn open<I>(
        ledger: &mut dyn Ledger,
        engine: Address,
        deposit_asset: Asset,
        targets: I,
    ) -> Self
    where
        I: IntoIterator<Item = Asset>,
    {
        let deposit = (deposit_asset, ledger.balance_of(engine, deposit_asset));
        let mut openings: Vec<(Asset, Amount)> = Vec::new();
        for asset in targets {
            if asset != deposit_asset && openings.iter().all(|(a, _)| *a != asset) {
                openings.push((asset, ledger.balance_of(engine, asset)));
            }
        }
        let checkpoint = ledger.checkpoint();
        Self {
            checkpoint,
            engine,
            deposit,
            openings,
        }
    }

    /// First balance that breaks the settlement rule: a non-zero deposit
    /// asset balance, or a target balance that moved.
    fn residual(&self, ledger: &dyn Ledger) -> Option<RouterError> {
        let (deposit_asset, deposit_opening) = self.deposit;
        let deposit_closing = ledger.balance_of(self.engine, deposit_asset);
        if !deposit_closing.is_zero() {
            return Some(RouterError::ResidualBalanceInvariantViolated {
                asset: deposit_asset,
                opening: deposit_opening,
                closing: deposit_closing,
            });
        }
        self.openings.iter().find_map(|&(asset, opening)| {
            let closing = ledger.balance_of(self.engine, asset);
            (closing != opening).then_some(RouterError::ResidualBalanceInvariantViolated {
                asset,
                opening,
                closing,
            })
        })
    }

    /// Commits or reverts depending on `outcome` and the residual check.
    ///
    /// # Errors
    ///
    /// - The error carried by `outcome`, after reverting.
    /// - [`RouterError::ResidualBalanceInvariantViolated`] if the call
    ///   succeeded but left the engine's balances changed, after reverting.
    pub fn close<T>(self, ledger: &mut dyn Ledger, outcome: Result<T>) -> Result<T> {
        match outcome {
            Err(err) => {
                ledger.revert_to(self.checkpoint);
                warn!(error = %err, "swap reverted");
                Err(err)
            }
            Ok(value) => {
                if let Some(violation) = self.residual(&*ledger) {
                    ledger.revert_to(self.checkpoint);
                    error!(
                        error = %violation,
                        "residual balance invariant violated; swap reverted"
                    );
                    return Err(violation);
                }
                ledger.commit(self.checkpoint);
                debug!(targets = self.openings.len(), "settlement committed");
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const ENGINE: Address = Address::repeat_byte(0x5e);
    const USER: Address = Address::repeat_byte(0x01);
    const ETH: Asset = Asset::new(Address::repeat_byte(0xee));
    const DAI: Asset = Asset::new(Address::repeat_byte(0xda));

    fn ledger() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        let Ok(()) = ledger.mint(ETH, USER, Amount::new(100)) else {
            panic!("mint");
        };
        ledger
    }

    #[test]
    fn balanced_call_commits() {
        let mut ledger = ledger();
        let guard = SettlementGuard::open(&mut ledger, ENGINE, ETH, [DAI]);
        let outcome = ledger
            .transfer(ETH, USER, ENGINE, Amount::new(10))
            .and_then(|()| ledger.transfer(ETH, ENGINE, USER, Amount::new(10)))
            .map_err(RouterError::from);
        assert_eq!(guard.close(&mut ledger, outcome), Ok(()));
        assert_eq!(ledger.depth(), 0);
    }

    #[test]
    fn stranded_funds_revert_the_call() {
        let mut ledger = ledger();
        let guard = SettlementGuard::open(&mut ledger, ENGINE, ETH, [DAI]);
        let outcome = ledger
            .transfer(ETH, USER, ENGINE, Amount::new(10))
            .map_err(RouterError::from);
        assert_eq!(
            guard.close(&mut ledger, outcome),
            Err(RouterError::ResidualBalanceInvariantViolated {
                asset: ETH,
                opening: Amount::ZERO,
                closing: Amount::new(10),
            })
        );
        assert_eq!(ledger.balance_of(USER, ETH), Amount::new(100));
        assert_eq!(ledger.balance_of(ENGINE, ETH), Amount::ZERO);
    }

    #[test]
    fn failed_call_reverts_earlier_transfers() {
        let mut ledger = ledger();
        let guard = SettlementGuard::open(&mut ledger, ENGINE, ETH, [DAI]);
        let Ok(()) = ledger.transfer(ETH, USER, ENGINE, Amount::new(10)) else {
            panic!("transfer");
        };
        let outcome: Result<()> = Err(RouterError::ZeroDeposit);
        assert_eq!(guard.close(&mut ledger, outcome), Err(RouterError::ZeroDeposit));
        assert_eq!(ledger.balance_of(USER, ETH), Amount::new(100));
    }

    #[test]
    fn pre_existing_target_balance_is_not_a_residual() {
        let mut ledger = ledger();
        let Ok(()) = ledger.mint(DAI, ENGINE, Amount::new(5)) else {
            panic!("mint");
        };
        let guard = SettlementGuard::open(&mut ledger, ENGINE, ETH, [DAI, DAI, ETH]);
        assert_eq!(guard.openings.len(), 1);
        assert_eq!(guard.close(&mut ledger, Ok(7)), Ok(7));
    }

    #[test]
    fn deposit_asset_must_close_at_zero() {
        let mut ledger = ledger();
        let Ok(()) = ledger.mint(ETH, ENGINE, Amount::new(5)) else {
            panic!("mint");
        };
        let guard = SettlementGuard::open(&mut ledger, ENGINE, ETH, [DAI]);
        let outcome = ledger
            .transfer(ETH, USER, ENGINE, Amount::new(10))
            .and_then(|()| ledger.transfer(ETH, ENGINE, USER, Amount::new(10)))
            .map_err(RouterError::from);
        assert_eq!(
            guard.close(&mut ledger, outcome),
            Err(RouterError::ResidualBalanceInvariantViolated {
                asset: ETH,
                opening: Amount::new(5),
                closing: Amount::new(5),
            })
        );
        assert_eq!(ledger.balance_of(USER, ETH), Amount::new(100));
        assert_eq!(ledger.depth(), 0);
    }
}
