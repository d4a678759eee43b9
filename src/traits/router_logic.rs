//! Routing-logic implementations that the proxy can activate.

use core::fmt;

use alloy_primitives::Address;
use serde::Serialize;

use crate::domain::{
    Asset, BasisPoints, CallContext, FeeConfig, SchemaVersion, SwapBranch, SwapReceipt, VenueKind,
};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::proxy::Migration;
use crate::router::SplitRouter;
use crate::venues::VenueRegistry;

/// Name and version of a routing implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImplementationId {
    /// Implementation name.
    pub name: &'static str,
    /// Implementation version.
    pub version: u16,
}

impl ImplementationId {
    /// Creates an identifier.
    #[must_use]
    pub const fn new(name: &'static str, version: u16) -> Self {
        Self { name, version }
    }
}

impl fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}V{}", self.name, self.version)
    }
}

/// Which venues one call may route through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VenuePolicy {
    /// Every branch uses the given venue.
    Fixed(VenueKind),
    /// Branches pick their venue; `swap` without explicit venues uses the default.
    Mixed {
        /// Venue for branches that do not name one.
        default: VenueKind,
    },
}

impl VenuePolicy {
    /// Venue used by `swap`, whose branches do not name one.
    #[must_use]
    pub const fn default_venue(&self) -> VenueKind {
        match *self {
            Self::Fixed(venue) | Self::Mixed { default: venue } => venue,
        }
    }

    /// Returns `true` if a branch may route through `venue`.
    #[must_use]
    pub fn permits(&self, venue: VenueKind) -> bool {
        match *self {
            Self::Fixed(fixed) => fixed == venue,
            Self::Mixed { .. } => true,
        }
    }
}

/// Proxy-owned context handed to the active implementation on every
/// forwarded call.
#[derive(Debug, Clone, Copy)]
pub struct ProxyFrame<'a> {
    /// Deployed venue adapters.
    pub venues: &'a VenueRegistry,
    /// The proxy's address, the account the implementation acts as.
    pub engine: Address,
    /// Asset accepted as deposit.
    pub deposit_asset: Asset,
    /// Fee configuration read from proxy storage.
    pub fees: FeeConfig,
}

/// A routing implementation addressed through the proxy.
///
/// Implementations hold no state: everything persistent lives in
/// [`ProxyStorage`](crate::proxy::ProxyStorage) and reaches them through a
/// [`ProxyFrame`]. The provided `swap` / `swap_multiple` route through a
/// [`SplitRouter`] under the implementation's venue policy; an
/// implementation may override either to change how calls are routed.
pub trait RouterLogic: fmt::Debug + Send + Sync {
    /// Identifies the implementation in logs and upgrade history.
    fn id(&self) -> ImplementationId;

    /// Venues a single call may use.
    fn venue_policy(&self) -> VenuePolicy;

    /// Storage layout this implementation reads and writes.
    fn storage_schema(&self) -> SchemaVersion {
        SchemaVersion::V1
    }

    /// Ordered migration steps leading up to [`storage_schema`](Self::storage_schema).
    ///
    /// The proxy applies the steps whose source is at or above the stored
    /// schema; a gap in the chain rejects the upgrade.
    fn migrations(&self) -> &[Migration] {
        &[]
    }

    /// Router acting for the proxy under this implementation's policy.
    fn router<'a>(&self, frame: &ProxyFrame<'a>) -> SplitRouter<'a> {
        SplitRouter::new(
            frame.venues,
            self.venue_policy(),
            frame.engine,
            frame.deposit_asset,
        )
    }

    /// `swap(targets, weights)`: every branch through the default venue's
    /// canonical pool for its target.
    ///
    /// # Errors
    ///
    /// Any [`SplitRouter::branches_for`] or [`SplitRouter::execute`] error.
    fn swap(
        &self,
        frame: &ProxyFrame<'_>,
        ledger: &mut dyn Ledger,
        ctx: CallContext,
        targets: &[Asset],
        weights: &[BasisPoints],
    ) -> Result<SwapReceipt> {
        let router = self.router(frame);
        let branches = router.branches_for(&*ledger, targets, weights)?;
        router.execute(ledger, &frame.fees, ctx, &branches)
    }

    /// `swapMultiple(branches)`: each branch names its venue and pool.
    ///
    /// # Errors
    ///
    /// Any [`SplitRouter::execute`] error.
    fn swap_multiple(
        &self,
        frame: &ProxyFrame<'_>,
        ledger: &mut dyn Ledger,
        ctx: CallContext,
        branches: &[SwapBranch],
    ) -> Result<SwapReceipt> {
        self.router(frame).execute(ledger, &frame.fees, ctx, branches)
    }
}
