//! Upgrade controller and versioned proxy storage.
//!
//! [`Proxy`] forwards calls to the active [`RouterLogic`](crate::traits::RouterLogic)
//! implementation while keeping [`ProxyStorage`] at its own address.
//! Upgrades migrate storage through explicit [`Migration`] steps and may
//! carry a [`Reinitializer`].

mod controller;
mod storage;

pub use controller::Proxy;
pub use storage::{Migration, ProxyStorage, Reinitializer};
