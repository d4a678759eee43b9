//! Persistent state held at the proxy address.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::domain::{BasisPoints, SchemaVersion};
use crate::error::{Result, RouterError};
use crate::router::FeeLedger;

/// Storage block that survives implementation swaps.
///
/// Schema 1 is the fee ledger alone. Later layouts add named slots to
/// `extension` through [`Migration`] steps; existing fields are never
/// reordered or resized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyStorage {
    schema: SchemaVersion,
    fees: FeeLedger,
    extension: BTreeMap<String, serde_json::Value>,
}

impl Default for ProxyStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyStorage {
    /// Empty schema-1 storage with an uninitialized fee ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: SchemaVersion::V1,
            fees: FeeLedger::uninitialized(),
            extension: BTreeMap::new(),
        }
    }

    /// Layout version currently stored.
    #[must_use]
    pub const fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Fee ledger slot.
    #[must_use]
    pub const fn fees(&self) -> &FeeLedger {
        &self.fees
    }

    /// Mutable fee ledger slot.
    pub fn fees_mut(&mut self) -> &mut FeeLedger {
        &mut self.fees
    }

    /// Value of an extension slot added by a migration.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&serde_json::Value> {
        self.extension.get(name)
    }

    /// Writes an extension slot, returning the previous value.
    pub fn set_slot(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.extension.insert(name.into(), value)
    }

    /// Brings the storage up to `target` by applying `steps` in order.
    ///
    /// Steps whose source is below the stored schema are skipped; the rest
    /// must form an unbroken chain ending at `target`. Work happens on a
    /// copy, so a failure leaves `self` untouched.
    ///
    /// # Errors
    ///
    /// - [`RouterError::IncompatibleStorageLayout`] if `target` is older
    ///   than the stored schema or the chain has a gap.
    /// - [`RouterError::MigrationFailed`] if a step rejects the storage.
    pub fn migrate(&mut self, target: SchemaVersion, steps: &[Migration]) -> Result<()> {
        let incompatible = RouterError::IncompatibleStorageLayout {
            current: self.schema,
            proposed: target,
        };
        if target < self.schema {
            return Err(incompatible);
        }

        let mut staged = self.clone();
        while staged.schema < target {
            let step = steps
                .iter()
                .find(|m| m.from == staged.schema && m.to > m.from && m.to <= target)
                .ok_or_else(|| incompatible.clone())?;
            (step.apply)(&mut staged).map_err(|reason| RouterError::MigrationFailed {
                from: step.from,
                to: step.to,
                reason,
            })?;
            staged.schema = step.to;
        }
        *self = staged;
        Ok(())
    }
}

/// One explicit storage layout transition.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Layout the step reads.
    pub from: SchemaVersion,
    /// Layout the step produces.
    pub to: SchemaVersion,
    /// Transforms the storage; the proxy bumps the schema afterwards.
    pub apply: fn(&mut ProxyStorage) -> core::result::Result<(), &'static str>,
}

/// Re-initialization call attached to an upgrade.
///
/// Runs atomically with the implementation swap; if it fails the upgrade
/// does not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reinitializer {
    /// Initializer version; must exceed the stored one.
    pub version: u8,
    /// New fee recipient.
    pub fee_recipient: Address,
    /// New fee rate.
    pub fee_rate: BasisPoints,
}

impl Reinitializer {
    /// Creates a reinitializer.
    #[must_use]
    pub const fn new(version: u8, fee_recipient: Address, fee_rate: BasisPoints) -> Self {
        Self {
            version,
            fee_recipient,
            fee_rate,
        }
    }

    /// Applies the reinitializer to `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::ReinitializationFailed`] wrapping the fee
    /// ledger's error.
    pub fn apply(&self, storage: &mut ProxyStorage) -> Result<()> {
        storage
            .fees_mut()
            .reinitialize(self.version, self.fee_recipient, self.fee_rate)
            .map_err(|err| RouterError::ReinitializationFailed(Box::new(err)))
    }
}
