//! Venue-selector to adapter mapping.

use std::collections::BTreeMap;

use crate::domain::VenueKind;
use crate::error::RouterError;
use crate::traits::VenueAdapter;

/// Maps each [`VenueKind`] to the adapter that executes it.
///
/// Adapters are added, never replaced: registering a second adapter for a
/// kind is rejected.
#[derive(Debug, Default)]
pub struct VenueRegistry {
    adapters: BTreeMap<VenueKind, Box<dyn VenueAdapter>>,
}

impl VenueRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `adapter` under its own [`VenueAdapter::kind`].
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfiguration`] if the kind is taken.
    pub fn register(&mut self, adapter: Box<dyn VenueAdapter>) -> Result<(), RouterError> {
        let kind = adapter.kind();
        if self.adapters.contains_key(&kind) {
            return Err(RouterError::InvalidConfiguration(format!(
                "venue {kind} registered twice"
            )));
        }
        self.adapters.insert(kind, adapter);
        Ok(())
    }

    /// Adapter for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownVenue`] if nothing is registered.
    pub fn get(&self, kind: VenueKind) -> Result<&dyn VenueAdapter, RouterError> {
        self.adapters
            .get(&kind)
            .map(|adapter| adapter.as_ref())
            .ok_or(RouterError::UnknownVenue(kind))
    }

    /// Returns `true` if an adapter is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: VenueKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Registered venue kinds in selector order.
    pub fn kinds(&self) -> impl Iterator<Item = VenueKind> + '_ {
        self.adapters.keys().copied()
    }
}
