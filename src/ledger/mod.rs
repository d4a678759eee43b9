//! Value-transfer substrate.
//!
//! The engine never holds balances itself: every deposit, fee payment,
//! pool trade and delivery is a [`Ledger::transfer`]. Pool reserves are the
//! pools' own ledger balances, so one rollback undoes fee transfers, venue
//! trades and deliveries together.
//!
//! # Transactions
//!
//! [`Ledger::checkpoint`] opens a (possibly nested) transaction.
//! [`Ledger::revert_to`] restores every balance touched since the
//! checkpoint; [`Ledger::commit`] keeps them. A checkpoint must be closed
//! exactly once, innermost first.

mod memory;

pub use memory::InMemoryLedger;

use alloy_primitives::Address;

use crate::domain::{Amount, Asset};
use crate::error::LedgerError;

/// Handle of an open transaction on a [`Ledger`].
///
/// Returned by [`Ledger::checkpoint`] and consumed by
/// [`Ledger::revert_to`] or [`Ledger::commit`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a checkpoint must be reverted or committed"]
pub struct Checkpoint {
    journal_len: usize,
    depth: usize,
}

impl Checkpoint {
    pub(crate) const fn new(journal_len: usize, depth: usize) -> Self {
        Self { journal_len, depth }
    }

    pub(crate) const fn journal_len(&self) -> usize {
        self.journal_len
    }

    /// Nesting depth of the transaction this checkpoint opened (1 = outermost).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// An atomic, reversible account-balance store.
pub trait Ledger {
    /// Balance of `asset` held by `account`.
    fn balance_of(&self, account: Address, asset: Asset) -> Amount;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// A zero amount or `from == to` is a no-op once the balance check
    /// passes.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `from` holds less than `amount`.
    /// - [`LedgerError::Overflow`] if `to`'s balance would overflow.
    fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Creates `amount` of `asset` in `to`'s account.
    ///
    /// Used to fund accounts and seed pool reserves.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the balance would overflow.
    fn mint(&mut self, asset: Asset, to: Address, amount: Amount) -> Result<(), LedgerError>;

    /// Opens a transaction.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Restores every balance changed since `checkpoint` and closes it.
    fn revert_to(&mut self, checkpoint: Checkpoint);

    /// Keeps every change since `checkpoint` and closes it.
    fn commit(&mut self, checkpoint: Checkpoint);
}
