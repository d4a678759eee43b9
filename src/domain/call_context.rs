//! Identity and value attached to a call.

use alloy_primitives::Address;

use super::Amount;

/// Who is calling and how much of the deposit asset the call carries.
///
/// The value is pulled from the caller inside the call's transaction, so
/// a reverted call never debits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallContext {
    caller: Address,
    value: Amount,
}

impl CallContext {
    /// A call from `caller` carrying `value`.
    #[must_use]
    pub const fn new(caller: Address, value: Amount) -> Self {
        Self { caller, value }
    }

    /// A call carrying no value.
    #[must_use]
    pub const fn without_value(caller: Address) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
        }
    }

    /// Calling identity.
    #[must_use]
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// Attached deposit.
    pub const fn value(&self) -> Amount {
        self.value
    }
}
