//! In-memory ledger with an undo journal.

use std::collections::HashMap;

use alloy_primitives::Address;
use tracing::trace;

use super::{Checkpoint, Ledger};
use crate::domain::{Amount, Asset};
use crate::error::LedgerError;

/// Previous value of one balance slot.
#[derive(Debug, Clone, Copy)]
struct JournalEntry {
    account: Address,
    asset: Asset,
    previous: Amount,
}

/// A [`Ledger`] backed by a hash map.
///
/// While at least one checkpoint is open every balance write records the
/// slot's previous value; reverting replays the journal backwards. The
/// journal is dropped when the outermost checkpoint commits.
///
/// # Example
///
/// ```
/// use alloy_primitives::Address;
/// use split_swap::domain::{Amount, Asset};
/// use split_swap::ledger::{InMemoryLedger, Ledger};
///
/// let eth = Asset::new(Address::repeat_byte(0xee));
/// let alice = Address::repeat_byte(1);
/// let bob = Address::repeat_byte(2);
///
/// let mut ledger = InMemoryLedger::new();
/// let Ok(()) = ledger.mint(eth, alice, Amount::new(10)) else { panic!() };
///
/// let cp = ledger.checkpoint();
/// let Ok(()) = ledger.transfer(eth, alice, bob, Amount::new(4)) else { panic!() };
/// ledger.revert_to(cp);
///
/// assert_eq!(ledger.balance_of(alice, eth), Amount::new(10));
/// assert_eq!(ledger.balance_of(bob, eth), Amount::ZERO);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Asset), Amount>,
    journal: Vec<JournalEntry>,
    depth: usize,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open transactions.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    fn write(&mut self, account: Address, asset: Asset, value: Amount) {
        let slot = self.balances.entry((account, asset)).or_default();
        if self.depth > 0 {
            self.journal.push(JournalEntry {
                account,
                asset,
                previous: *slot,
            });
        }
        *slot = value;
    }

    fn close(&mut self, checkpoint: &Checkpoint) {
        // Closing out of order would leave the journal inconsistent.
        debug_assert_eq!(checkpoint.depth(), self.depth, "checkpoints close innermost first");
        self.depth = checkpoint.depth().saturating_sub(1);
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, account: Address, asset: Asset) -> Amount {
        self.balances
            .get(&(account, asset))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from, asset);
        let remaining = available
            .checked_sub(&amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                asset,
                required: amount,
                available,
            })?;
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to, asset)
            .checked_add(&amount)
            .ok_or(LedgerError::Overflow { account: to, asset })?;

        self.write(from, asset, remaining);
        self.write(to, asset, credited);
        trace!(%asset, %from, %to, %amount, "transfer");
        Ok(())
    }

    fn mint(&mut self, asset: Asset, to: Address, amount: Amount) -> Result<(), LedgerError> {
        let credited = self
            .balance_of(to, asset)
            .checked_add(&amount)
            .ok_or(LedgerError::Overflow { account: to, asset })?;
        self.write(to, asset, credited);
        trace!(%asset, %to, %amount, "mint");
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint::new(self.journal.len(), self.depth)
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal_len() {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            self.balances
                .insert((entry.account, entry.asset), entry.previous);
        }
        self.close(&checkpoint);
        trace!(depth = self.depth, "reverted");
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.close(&checkpoint);
        if self.depth == 0 {
            self.journal.clear();
        }
        trace!(depth = self.depth, "committed");
    }
}
