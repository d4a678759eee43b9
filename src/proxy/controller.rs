//! The upgrade controller: a fixed-address indirection over the active
//! routing implementation.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{info, warn};

use super::{ProxyStorage, Reinitializer};
use crate::domain::{Asset, BasisPoints, CallContext, FeeConfig, SwapBranch, SwapReceipt};
use crate::error::{Result, RouterError};
use crate::ledger::Ledger;
use crate::traits::{ImplementationId, ProxyFrame, RouterLogic};
use crate::venues::VenueRegistry;

/// Transparent proxy in front of a [`RouterLogic`] implementation.
///
/// Callers always address the proxy. Persistent state ([`ProxyStorage`])
/// lives here, not in the implementation, so swapping the implementation
/// keeps the fee configuration bit-for-bit unless a [`Reinitializer`] is
/// attached to the upgrade.
///
/// # Roles
///
/// - The **admin** may [`upgrade`](Self::upgrade) and
///   [`change_admin`](Self::change_admin) but cannot reach the routing
///   operations.
/// - Everyone else may call [`initialize`](Self::initialize),
///   [`swap`](Self::swap) and [`swap_multiple`](Self::swap_multiple),
///   which are forwarded to the active implementation.
#[derive(Debug, Clone)]
pub struct Proxy {
    address: Address,
    admin: Address,
    deposit_asset: Asset,
    implementation: Arc<dyn RouterLogic>,
    storage: ProxyStorage,
    history: Vec<ImplementationId>,
}

impl Proxy {
    /// Deploys a proxy at `address` pointing at `implementation`.
    ///
    /// Storage starts empty at the implementation's schema; call
    /// [`initialize`](Self::initialize) before the first swap.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::IncompatibleStorageLayout`] or
    /// [`RouterError::MigrationFailed`] if the implementation's migration
    /// chain cannot produce its schema from an empty schema-1 block.
    pub fn new(
        address: Address,
        admin: Address,
        deposit_asset: Asset,
        implementation: Arc<dyn RouterLogic>,
    ) -> Result<Self> {
        let mut storage = ProxyStorage::new();
        storage.migrate(implementation.storage_schema(), implementation.migrations())?;
        let id = implementation.id();
        info!(%address, %admin, implementation = %id, "proxy deployed");
        Ok(Self {
            address,
            admin,
            deposit_asset,
            implementation,
            storage,
            history: vec![id],
        })
    }

    /// Deploys a proxy and runs the initializer as part of construction.
    ///
    /// The initializer call belongs to the deployment itself, so the
    /// admin rule of [`initialize`](Self::initialize) does not apply.
    ///
    /// # Errors
    ///
    /// Any [`new`](Self::new) error, [`RouterError::InvalidFeeRecipient`]
    /// if the recipient is the proxy itself, plus the fee validation errors
    /// of [`FeeLedger::initialize`](crate::router::FeeLedger::initialize).
    pub fn deploy(
        address: Address,
        admin: Address,
        deposit_asset: Asset,
        implementation: Arc<dyn RouterLogic>,
        fees: FeeConfig,
    ) -> Result<Self> {
        let mut proxy = Self::new(address, admin, deposit_asset, implementation)?;
        proxy.check_recipient(fees.recipient())?;
        proxy
            .storage
            .fees_mut()
            .initialize(fees.recipient(), fees.rate())?;
        Ok(proxy)
    }

    /// The proxy's own address (the engine's ledger account).
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Current admin.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Asset accepted as deposit.
    #[must_use]
    pub const fn deposit_asset(&self) -> Asset {
        self.deposit_asset
    }

    /// Identifier of the active implementation.
    #[must_use]
    pub fn implementation(&self) -> ImplementationId {
        self.implementation.id()
    }

    /// Every implementation activated so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ImplementationId] {
        &self.history
    }

    /// Persistent storage.
    #[must_use]
    pub const fn storage(&self) -> &ProxyStorage {
        &self.storage
    }

    /// Stored fee configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NotInitialized`] before `initialize`.
    pub fn fee_config(&self) -> Result<FeeConfig> {
        self.storage.fees().config()
    }

    fn forward(&self, caller: Address) -> Result<()> {
        if caller == self.admin {
            return Err(RouterError::AdminCannotCallImplementation);
        }
        Ok(())
    }

    /// The proxy cannot be its own fee recipient.
    fn check_recipient(&self, recipient: Address) -> Result<()> {
        if recipient == self.address {
            return Err(RouterError::InvalidFeeRecipient);
        }
        Ok(())
    }

    fn frame<'a>(&self, venues: &'a VenueRegistry) -> Result<ProxyFrame<'a>> {
        Ok(ProxyFrame {
            venues,
            engine: self.address,
            deposit_asset: self.deposit_asset,
            fees: self.fee_config()?,
        })
    }

    /// One-time initializer of the fee configuration.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AdminCannotCallImplementation`] if `caller` is the admin.
    /// - [`RouterError::InvalidFeeRecipient`] if `fee_recipient` is the proxy.
    /// - Any [`FeeLedger::initialize`](crate::router::FeeLedger::initialize) error.
    pub fn initialize(
        &mut self,
        caller: Address,
        fee_recipient: Address,
        fee_rate: BasisPoints,
    ) -> Result<()> {
        self.forward(caller)?;
        self.check_recipient(fee_recipient)?;
        self.storage.fees_mut().initialize(fee_recipient, fee_rate)
    }

    /// `swap(targets, weights)`, forwarded to the active implementation.
    ///
    /// # Errors
    ///
    /// - [`RouterError::AdminCannotCallImplementation`] if called by the admin.
    /// - [`RouterError::NotInitialized`] before `initialize`.
    /// - Any [`SplitRouter`](crate::router::SplitRouter) error, or whatever the
    ///   active implementation reports.
    pub fn swap(
        &self,
        ledger: &mut dyn Ledger,
        venues: &VenueRegistry,
        ctx: CallContext,
        targets: &[Asset],
        weights: &[BasisPoints],
    ) -> Result<SwapReceipt> {
        self.forward(ctx.caller())?;
        let frame = self.frame(venues)?;
        self.implementation.swap(&frame, ledger, ctx, targets, weights)
    }

    /// `swapMultiple(branches)`, forwarded to the active implementation.
    ///
    /// # Errors
    ///
    /// As [`swap`](Self::swap), plus [`RouterError::VenueNotSupported`] when
    /// the active implementation does not permit a branch's venue.
    pub fn swap_multiple(
        &self,
        ledger: &mut dyn Ledger,
        venues: &VenueRegistry,
        ctx: CallContext,
        branches: &[SwapBranch],
    ) -> Result<SwapReceipt> {
        self.forward(ctx.caller())?;
        let frame = self.frame(venues)?;
        self.implementation.swap_multiple(&frame, ledger, ctx, branches)
    }

    /// Replaces the active implementation.
    ///
    /// Storage is migrated to the new implementation's schema and the
    /// optional reinitializer runs, all on a staged copy; the pointer swap
    /// happens only if every step succeeds, so a failed upgrade leaves the
    /// old implementation and storage in place.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnauthorizedUpgrade`] if `caller` is not the admin.
    /// - [`RouterError::IncompatibleStorageLayout`] / [`RouterError::MigrationFailed`]
    ///   if storage cannot be brought to the new schema.
    /// - [`RouterError::ReinitializationFailed`] if the reinitializer fails
    ///   or names the proxy itself as fee recipient.
    pub fn upgrade(
        &mut self,
        caller: Address,
        implementation: Arc<dyn RouterLogic>,
        reinit: Option<Reinitializer>,
    ) -> Result<()> {
        if caller != self.admin {
            warn!(%caller, "unauthorized upgrade rejected");
            return Err(RouterError::UnauthorizedUpgrade { caller });
        }

        let mut staged = self.storage.clone();
        let outcome = staged
            .migrate(implementation.storage_schema(), implementation.migrations())
            .and_then(|()| match reinit {
                Some(call) => self
                    .check_recipient(call.fee_recipient)
                    .map_err(|err| RouterError::ReinitializationFailed(Box::new(err)))
                    .and_then(|()| call.apply(&mut staged)),
                None => Ok(()),
            });
        if let Err(err) = outcome {
            warn!(error = %err, to = %implementation.id(), "upgrade rolled back");
            return Err(err);
        }

        let from = self.implementation.id();
        let to = implementation.id();
        self.storage = staged;
        self.implementation = implementation;
        self.history.push(to);
        info!(
            %from,
            %to,
            schema = %self.storage.schema(),
            reinitialized = reinit.is_some(),
            "proxy upgraded"
        );
        Ok(())
    }

    /// Hands upgrade authority to `new_admin`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnauthorizedUpgrade`] if `caller` is not the admin.
    pub fn change_admin(&mut self, caller: Address, new_admin: Address) -> Result<()> {
        if caller != self.admin {
            warn!(%caller, "unauthorized admin change rejected");
            return Err(RouterError::UnauthorizedUpgrade { caller });
        }
        info!(from = %self.admin, to = %new_admin, "proxy admin changed");
        self.admin = new_admin;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{SchemaVersion, VenueKind};
    use crate::proxy::Migration;
    use crate::router::{SwapperV1, SwapperV2};
    use crate::traits::VenuePolicy;

    const ENGINE: Address = Address::repeat_byte(0x5e);
    const ADMIN: Address = Address::repeat_byte(0xad);
    const USER: Address = Address::repeat_byte(0x01);
    const FEE_TO: Address = Address::repeat_byte(0xfe);
    const WETH: Asset = Asset::new(Address::repeat_byte(0xee));

    /// Implementation expecting schema 2, with a migration from 1.
    #[derive(Debug)]
    struct SwapperV3;

    fn add_pause_flag(storage: &mut ProxyStorage) -> core::result::Result<(), &'static str> {
        storage.set_slot("paused", serde_json::Value::Bool(false));
        Ok(())
    }

    const V3_MIGRATIONS: [Migration; 1] = [Migration {
        from: SchemaVersion::V1,
        to: SchemaVersion::new(2),
        apply: add_pause_flag,
    }];

    impl RouterLogic for SwapperV3 {
        fn id(&self) -> ImplementationId {
            ImplementationId::new("Swapper", 3)
        }

        fn venue_policy(&self) -> VenuePolicy {
            VenuePolicy::Mixed {
                default: VenueKind::Balancer,
            }
        }

        fn storage_schema(&self) -> SchemaVersion {
            SchemaVersion::new(2)
        }

        fn migrations(&self) -> &[Migration] {
            &V3_MIGRATIONS
        }
    }

    fn deployed() -> Proxy {
        let Ok(mut proxy) = Proxy::new(ENGINE, ADMIN, WETH, Arc::new(SwapperV1)) else {
            panic!("deploy");
        };
        let Ok(()) = proxy.initialize(USER, FEE_TO, BasisPoints::new(10)) else {
            panic!("initialize");
        };
        proxy
    }

    #[test]
    fn admin_cannot_initialize() {
        let Ok(mut proxy) = Proxy::new(ENGINE, ADMIN, WETH, Arc::new(SwapperV1)) else {
            panic!("deploy");
        };
        assert_eq!(
            proxy.initialize(ADMIN, FEE_TO, BasisPoints::new(10)),
            Err(RouterError::AdminCannotCallImplementation)
        );
    }

    #[test]
    fn second_initialize_fails_and_keeps_config() {
        let mut proxy = deployed();
        assert_eq!(
            proxy.initialize(USER, Address::repeat_byte(0x02), BasisPoints::new(99)),
            Err(RouterError::AlreadyInitialized)
        );
        assert_eq!(
            proxy.fee_config(),
            Ok(FeeConfig::new(FEE_TO, BasisPoints::new(10)))
        );
    }

    #[test]
    fn upgrade_preserves_storage() {
        let mut proxy = deployed();
        let before = proxy.storage().clone();
        let Ok(()) = proxy.upgrade(ADMIN, Arc::new(SwapperV2), None) else {
            panic!("upgrade");
        };
        assert_eq!(proxy.storage(), &before);
        assert_eq!(proxy.implementation(), SwapperV2.id());
        assert_eq!(proxy.history(), &[SwapperV1.id(), SwapperV2.id()]);
    }

    #[test]
    fn non_admin_upgrade_rejected() {
        let mut proxy = deployed();
        assert_eq!(
            proxy.upgrade(USER, Arc::new(SwapperV2), None),
            Err(RouterError::UnauthorizedUpgrade { caller: USER })
        );
        assert_eq!(proxy.implementation(), SwapperV1.id());
        assert_eq!(proxy.history().len(), 1);
    }

    #[test]
    fn reinitializer_rewrites_fee_config() {
        let mut proxy = deployed();
        let reinit = Reinitializer::new(2, Address::repeat_byte(0x02), BasisPoints::new(25));
        let Ok(()) = proxy.upgrade(ADMIN, Arc::new(SwapperV2), Some(reinit)) else {
            panic!("upgrade");
        };
        assert_eq!(
            proxy.fee_config(),
            Ok(FeeConfig::new(Address::repeat_byte(0x02), BasisPoints::new(25)))
        );
        assert_eq!(proxy.storage().fees().initialized_version(), 2);
    }

    #[test]
    fn failed_reinitializer_voids_upgrade() {
        let mut proxy = deployed();
        let reinit = Reinitializer::new(2, Address::ZERO, BasisPoints::new(25));
        assert_eq!(
            proxy.upgrade(ADMIN, Arc::new(SwapperV2), Some(reinit)),
            Err(RouterError::ReinitializationFailed(Box::new(
                RouterError::InvalidFeeRecipient
            )))
        );
        assert_eq!(proxy.implementation(), SwapperV1.id());
        assert_eq!(
            proxy.fee_config(),
            Ok(FeeConfig::new(FEE_TO, BasisPoints::new(10)))
        );
    }

    #[test]
    fn upgrade_runs_migrations_and_keeps_fees() {
        let mut proxy = deployed();
        let Ok(()) = proxy.upgrade(ADMIN, Arc::new(SwapperV3), None) else {
            panic!("upgrade");
        };
        assert_eq!(proxy.storage().schema(), SchemaVersion::new(2));
        assert_eq!(
            proxy.storage().slot("paused"),
            Some(&serde_json::Value::Bool(false))
        );
        assert_eq!(
            proxy.fee_config(),
            Ok(FeeConfig::new(FEE_TO, BasisPoints::new(10)))
        );
    }

    #[test]
    fn downgrade_to_older_schema_rejected() {
        let mut proxy = deployed();
        let Ok(()) = proxy.upgrade(ADMIN, Arc::new(SwapperV3), None) else {
            panic!("upgrade");
        };
        assert_eq!(
            proxy.upgrade(ADMIN, Arc::new(SwapperV2), None),
            Err(RouterError::IncompatibleStorageLayout {
                current: SchemaVersion::new(2),
                proposed: SchemaVersion::V1,
            })
        );
        assert_eq!(proxy.implementation(), SwapperV3.id());
    }

    #[test]
    fn admin_handover() {
        let mut proxy = deployed();
        assert!(proxy.change_admin(USER, USER).is_err());
        let Ok(()) = proxy.change_admin(ADMIN, USER) else {
            panic!("change admin");
        };
        assert_eq!(proxy.admin(), USER);
        assert!(proxy.upgrade(ADMIN, Arc::new(SwapperV2), None).is_err());
        let Ok(()) = proxy.upgrade(USER, Arc::new(SwapperV2), None) else {
            panic!("new admin upgrades");
        };
    }

    #[test]
    fn swap_before_initialize_rejected() {
        let Ok(proxy) = Proxy::new(ENGINE, ADMIN, WETH, Arc::new(SwapperV1)) else {
            panic!("deploy");
        };
        let mut ledger = crate::ledger::InMemoryLedger::new();
        let venues = VenueRegistry::new();
        assert_eq!(
            proxy.swap_multiple(&mut ledger, &venues, CallContext::without_value(USER), &[]),
            Err(RouterError::NotInitialized)
        );
        assert_eq!(
            proxy.swap_multiple(&mut ledger, &venues, CallContext::without_value(ADMIN), &[]),
            Err(RouterError::AdminCannotCallImplementation)
        );
    }

    // -- fee recipient ------------------------------------------------------

    #[test]
    fn proxy_cannot_be_its_own_fee_recipient() {
        let Ok(mut proxy) = Proxy::new(ENGINE, ADMIN, WETH, Arc::new(SwapperV1)) else {
            panic!("deploy");
        };
        assert_eq!(
            proxy.initialize(USER, ENGINE, BasisPoints::new(10)),
            Err(RouterError::InvalidFeeRecipient)
        );
        assert_eq!(proxy.fee_config(), Err(RouterError::NotInitialized));

        assert_eq!(
            Proxy::deploy(
                ENGINE,
                ADMIN,
                WETH,
                Arc::new(SwapperV1),
                FeeConfig::new(ENGINE, BasisPoints::new(10)),
            )
            .map(|p| p.implementation()),
            Err(RouterError::InvalidFeeRecipient)
        );
    }

    #[test]
    fn reinitializer_naming_the_proxy_voids_upgrade() {
        let mut proxy = deployed();
        let reinit = Reinitializer::new(2, ENGINE, BasisPoints::new(10));
        assert_eq!(
            proxy.upgrade(ADMIN, Arc::new(SwapperV2), Some(reinit)),
            Err(RouterError::ReinitializationFailed(Box::new(
                RouterError::InvalidFeeRecipient
            )))
        );
        assert_eq!(proxy.implementation(), SwapperV1.id());
        assert_eq!(
            proxy.fee_config(),
            Ok(FeeConfig::new(FEE_TO, BasisPoints::new(10)))
        );
        assert_eq!(proxy.storage().fees().initialized_version(), 1);
    }

    // -- forwarding ---------------------------------------------------------

    /// Implementation that refuses every routing call.
    #[derive(Debug)]
    struct HaltedSwapper;

    impl RouterLogic for HaltedSwapper {
        fn id(&self) -> ImplementationId {
            ImplementationId::new("HaltedSwapper", 1)
        }

        fn venue_policy(&self) -> VenuePolicy {
            VenuePolicy::Fixed(VenueKind::UniswapV2)
        }

        fn swap(
            &self,
            _frame: &ProxyFrame<'_>,
            _ledger: &mut dyn Ledger,
            _ctx: CallContext,
            _targets: &[Asset],
            _weights: &[BasisPoints],
        ) -> Result<SwapReceipt> {
            Err(RouterError::InvalidConfiguration("routing halted".to_string()))
        }

        fn swap_multiple(
            &self,
            _frame: &ProxyFrame<'_>,
            _ledger: &mut dyn Ledger,
            _ctx: CallContext,
            _branches: &[SwapBranch],
        ) -> Result<SwapReceipt> {
            Err(RouterError::InvalidConfiguration("routing halted".to_string()))
        }
    }

    #[test]
    fn calls_reach_the_upgraded_implementation() {
        let mut proxy = deployed();
        let mut ledger = crate::ledger::InMemoryLedger::new();
        let venues = VenueRegistry::new();
        let ctx = CallContext::without_value(USER);

        // V1 routes and fails on the empty call itself.
        assert_eq!(
            proxy.swap_multiple(&mut ledger, &venues, ctx, &[]),
            Err(RouterError::EmptyDistribution)
        );

        let Ok(()) = proxy.upgrade(ADMIN, Arc::new(HaltedSwapper), None) else {
            panic!("upgrade");
        };
        let halted = Err(RouterError::InvalidConfiguration("routing halted".to_string()));
        assert_eq!(proxy.swap_multiple(&mut ledger, &venues, ctx, &[]), halted);
        assert_eq!(proxy.swap(&mut ledger, &venues, ctx, &[], &[]), halted);
    }
}
