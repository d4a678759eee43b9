//! Asset and pool identifiers.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Identifier of a fungible asset on the ledger (the asset's contract address).
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use split_swap::domain::Asset;
///
/// let weth = Asset::new(Address::repeat_byte(0xee));
/// assert_eq!(weth.address(), Address::repeat_byte(0xee));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Asset(Address);

impl Asset {
    /// Wraps an asset address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the asset's address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl FromStr for Asset {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a pool inside a venue: the pool's own ledger account.
///
/// Pool reserves are the pool account's balances, so a pool reference is
/// also where a branch's input is paid and its output drawn from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PoolRef(Address);

impl PoolRef {
    /// Wraps a pool address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the pool's ledger account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl FromStr for PoolRef {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for PoolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_address() {
        let Ok(asset) = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse::<Asset>() else {
            panic!("valid address");
        };
        let Ok(raw) = "0x6b175474e89094c44da98b954eedeac495271d0f".parse::<Address>() else {
            panic!("valid address");
        };
        assert_eq!(asset.address(), raw);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-an-address".parse::<PoolRef>().is_err());
    }

    #[test]
    fn ordering_follows_address_bytes() {
        let lo = Asset::new(Address::repeat_byte(1));
        let hi = Asset::new(Address::repeat_byte(2));
        assert!(lo < hi);
    }

    #[test]
    fn serde_round_trips_through_hex() {
        let pool = PoolRef::new(Address::repeat_byte(0xab));
        let Ok(json) = serde_json::to_string(&pool) else {
            panic!("serialize");
        };
        let Ok(back) = serde_json::from_str::<PoolRef>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, pool);
    }
}
