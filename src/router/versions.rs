//! The routing implementations deployed behind the proxy.
//!
//! Both share storage schema 1 (the fee configuration). The only
//! behavioural difference is the venue policy: V1 routes every branch of a
//! call through Venue A; V2 lets each branch pick its venue.

use crate::domain::VenueKind;
use crate::traits::{ImplementationId, RouterLogic, VenuePolicy};

/// First implementation: single venue family per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwapperV1;

impl RouterLogic for SwapperV1 {
    fn id(&self) -> ImplementationId {
        ImplementationId::new("Swapper", 1)
    }

    fn venue_policy(&self) -> VenuePolicy {
        VenuePolicy::Fixed(VenueKind::UniswapV2)
    }
}

/// Second implementation: venues may be mixed within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwapperV2;

impl RouterLogic for SwapperV2 {
    fn id(&self) -> ImplementationId {
        ImplementationId::new("Swapper", 2)
    }

    fn venue_policy(&self) -> VenuePolicy {
        VenuePolicy::Mixed {
            default: VenueKind::UniswapV2,
        }
    }
}
