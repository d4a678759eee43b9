//! Venue selector tag.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag selecting which venue adapter executes a branch.
///
/// The discriminants are the wire values of the `dex` field in a
/// `swapMultiple` branch. New venues get new variants; existing variants
/// never change meaning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum VenueKind {
    /// Constant-product pairs (Uniswap V2 family).
    UniswapV2 = 0,
    /// Weighted multi-asset pools (Balancer family).
    Balancer = 1,
}

impl VenueKind {
    /// Every known venue, in wire order.
    pub const ALL: [Self; 2] = [Self::UniswapV2, Self::Balancer];

    /// Returns the wire discriminant.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Decodes a wire discriminant.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::UniswapV2),
            1 => Some(Self::Balancer),
            _ => None,
        }
    }

    /// Returns the kebab-case name used in configuration files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UniswapV2 => "uniswap-v2",
            Self::Balancer => "balancer",
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VenueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniswap-v2" | "uniswap" | "0" => Ok(Self::UniswapV2),
            "balancer" | "1" => Ok(Self::Balancer),
            other => Err(format!("unknown venue `{other}`")),
        }
    }
}
