//! Fee accounting, split routing and settlement.
//!
//! - [`FeeLedger`]: persistent fee configuration and `(fee, net)` arithmetic.
//! - [`SplitRouter`]: validates a call, splits the net deposit and
//!   dispatches each branch to its venue adapter.
//! - [`SettlementGuard`]: commits only balanced calls; reverts the rest.
//! - [`SwapperV1`] / [`SwapperV2`]: the implementations activated through
//!   the [`Proxy`](crate::proxy::Proxy).

mod fee_ledger;
mod settlement;
mod split_router;
mod versions;

#[cfg(all(test, feature = "uniswap-v2"))]
#[allow(clippy::panic)]
mod proptest_properties;

pub use fee_ledger::FeeLedger;
pub use settlement::SettlementGuard;
pub use split_router::{RouterPhase, SplitRouter};
pub use versions::{SwapperV1, SwapperV2};
