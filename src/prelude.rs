//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use split_swap::prelude::*;
//! ```

pub use crate::domain::{
    Amount, Asset, BasisPoints, BranchFill, CallContext, FeeConfig, PoolRef, Rounding,
    SwapBranch, SwapReceipt, VenueKind,
};

pub use crate::traits::{FromConfig, RouterLogic, VenueAdapter};

pub use crate::ledger::{InMemoryLedger, Ledger};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{EngineConfig, VenueConfig};

pub use crate::error::{Result, RouterError, VenueError};

pub use crate::factory::VenueFactory;

pub use crate::deploy::{deploy, Deployment};

pub use crate::proxy::{Proxy, Reinitializer};

pub use crate::router::{SwapperV1, SwapperV2};

pub use crate::venues::VenueRegistry;
