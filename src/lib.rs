//! # Split Swap
//!
//! Split-and-route swap engine: one deposit of a base asset is charged a
//! protocol fee, divided by weight across several target assets, and each
//! share is traded on its own liquidity venue. Every output is delivered
//! to the caller within one all-or-nothing call, and the engine sits
//! behind an upgradeable proxy whose fee configuration survives upgrades.
//!
//! Two venue families are built in:
//!
//! - **Constant-product pairs** (Uniswap V2 style), `uniswap-v2` feature
//! - **Weighted pools** (Balancer style), `balancer` feature
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `uniswap-v2` | yes | Constant-product venue adapter |
//! | `balancer` | yes | Weighted-pool venue adapter |
//! | `all-venues` | yes | Enables both venues |
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(feature = "uniswap-v2")]
//! # {
//! use alloy_primitives::Address;
//! use split_swap::config::EngineConfig;
//! use split_swap::deploy::deploy;
//! use split_swap::domain::{Amount, Asset, BasisPoints, CallContext};
//!
//! let config = EngineConfig::from_toml_str(r#"
//! engine = "0x5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e"
//! admin = "0xadadadadadadadadadadadadadadadadadadadad"
//! fee_recipient = "0xfefefefefefefefefefefefefefefefefefefefe"
//! fee_rate_bps = 10
//! deposit_asset = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
//!
//! [[accounts]]
//! address = "0x0101010101010101010101010101010101010101"
//! asset = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
//! balance = "5000000000000000000"
//!
//! [[venues]]
//! kind = "uniswap-v2"
//!
//! [[venues.pairs]]
//! address = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1"
//! token0 = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
//! token1 = "0xdadadadadadadadadadadadadadadadadadadada"
//! reserve0 = "100000000000000000000"
//! reserve1 = "200000000000000000000000"
//! "#).expect("valid config");
//!
//! let mut engine = deploy(&config).expect("deployed");
//! let user = Address::repeat_byte(0x01);
//! let dai = Asset::new(Address::repeat_byte(0xda));
//!
//! let receipt = engine
//!     .swap(CallContext::new(user, Amount::ONE_ETHER), &[dai], &[BasisPoints::new(10_000)])
//!     .expect("swap commits");
//! assert_eq!(receipt.fee, Amount::new(1_000_000_000_000_000));
//! assert!(engine.balance_of(user, dai).get() > 0);
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller     │  swap / swapMultiple with attached value
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    Proxy      │  admin rule, storage (FeeConfig), upgrades
//! └──────┬───────┘
//!        │ active RouterLogic (SwapperV1 / SwapperV2)
//!        ▼
//! ┌──────────────┐
//! │ SplitRouter   │  fee, allocation, dispatch inside SettlementGuard
//! └──────┬───────┘
//!        │ VenueRegistry
//!        ▼
//! ┌──────────────┐
//! │ VenueAdapter  │  UniswapV2Adapter, BalancerAdapter
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    Ledger     │  balances, nested checkpoints, rollback
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`BasisPoints`](domain::BasisPoints), [`SwapBranch`](domain::SwapBranch), etc. |
//! | [`traits`] | Core abstractions: [`VenueAdapter`](traits::VenueAdapter), [`RouterLogic`](traits::RouterLogic), [`FromConfig`](traits::FromConfig) |
//! | [`ledger`] | [`Ledger`](ledger::Ledger) substrate and [`InMemoryLedger`](ledger::InMemoryLedger) |
//! | [`venues`] | Feature-gated venue adapters and the [`VenueRegistry`](venues::VenueRegistry) |
//! | [`router`] | [`FeeLedger`](router::FeeLedger), [`SplitRouter`](router::SplitRouter), [`SettlementGuard`](router::SettlementGuard) |
//! | [`proxy`] | [`Proxy`](proxy::Proxy), [`ProxyStorage`](proxy::ProxyStorage), migrations |
//! | [`config`] | Declarative blueprints: [`EngineConfig`](config::EngineConfig), [`VenueConfig`](config::VenueConfig) |
//! | [`factory`] | [`VenueFactory`](factory::VenueFactory) for config-driven venue construction |
//! | [`deploy`] | [`Deployment`](deploy::Deployment) and the upgrade helpers |
//! | [`math`]   | Checked arithmetic and 256-bit `mul_div` |
//! | [`error`]  | [`RouterError`](error::RouterError), [`VenueError`](error::VenueError), [`LedgerError`](error::LedgerError) |
//! | [`logging`] | Subscriber setup for binaries |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod deploy;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod logging;
pub mod math;
pub mod prelude;
pub mod proxy;
pub mod router;
pub mod traits;
pub mod venues;
