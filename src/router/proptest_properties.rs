//! Property-based tests for the routing invariants.
//!
//! 1. **Fee conservation**: `fee + net == deposit`, `fee == floor(d × r / 10 000)`.
//! 2. **Allocation**: branch amounts sum to `net`; all but the last are floors.
//! 3. **Distribution check**: any weights not summing to 10 000 are rejected.
//! 4. **Zero residual**: after any committed swap the engine holds nothing,
//!    the fee recipient gained exactly the fee and the caller paid the deposit.
//! 5. **Pool invariant**: a constant-product trade never decreases `k`.

use alloy_primitives::{Address, U256};
use proptest::prelude::*;

use super::{FeeLedger, SplitRouter};
use crate::domain::{
    Amount, Asset, BasisPoints, CallContext, Distribution, FeeConfig, PoolRef, SwapBranch,
    VenueKind,
};
use crate::error::RouterError;
use crate::ledger::{InMemoryLedger, Ledger};
use crate::traits::VenuePolicy;
use crate::venues::{constant_product, UniswapV2Adapter, UniswapV2Pair, VenueRegistry};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const ENGINE: Address = Address::repeat_byte(0x5e);
const USER: Address = Address::repeat_byte(0x01);
const FEE_TO: Address = Address::repeat_byte(0xfe);
const WETH: Asset = Asset::new(Address::repeat_byte(0xee));
const MAX_BRANCHES: usize = 6;

fn target(i: usize) -> Asset {
    Asset::new(Address::repeat_byte(0x10 + i as u8))
}

fn pool(i: usize) -> PoolRef {
    PoolRef::new(Address::repeat_byte(0xa0 + i as u8))
}

fn floor_bps(amount: u128, bps: u32) -> u128 {
    let wide = U256::from(amount) * U256::from(bps) / U256::from(10_000u32);
    let Ok(v) = u128::try_from(wide) else {
        panic!("fits");
    };
    v
}

/// One pair per possible target, each seeded with `reserve` on both sides.
fn world(reserve: u128, deposit: u128) -> (VenueRegistry, InMemoryLedger) {
    let mut adapter = UniswapV2Adapter::new();
    let mut ledger = InMemoryLedger::new();
    for i in 0..MAX_BRANCHES {
        let Ok(pair) = UniswapV2Pair::new(pool(i), WETH, target(i), BasisPoints::new(30)) else {
            panic!("pair");
        };
        let Ok(()) = adapter.add_pair(pair) else {
            panic!("add pair");
        };
        for asset in [WETH, target(i)] {
            let Ok(()) = ledger.mint(asset, pool(i).address(), Amount::new(reserve)) else {
                panic!("seed");
            };
        }
    }
    let Ok(()) = ledger.mint(WETH, USER, Amount::new(deposit)) else {
        panic!("fund");
    };
    let mut venues = VenueRegistry::new();
    let Ok(()) = venues.register(Box::new(adapter)) else {
        panic!("register");
    };
    (venues, ledger)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Weights in basis points that sum to exactly 10 000.
fn weights_strategy() -> impl Strategy<Value = Vec<u32>> {
    (1usize..=MAX_BRANCHES)
        .prop_flat_map(|n| prop::collection::vec(0u32..=10_000, n - 1))
        .prop_map(|mut cuts| {
            cuts.sort_unstable();
            let mut weights = Vec::with_capacity(cuts.len() + 1);
            let mut previous = 0;
            for cut in cuts {
                weights.push(cut - previous);
                previous = cut;
            }
            weights.push(10_000 - previous);
            weights
        })
}

fn rate_strategy() -> impl Strategy<Value = u32> {
    0u32..=10_000
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_fee_conservation(deposit in any::<u128>(), rate in rate_strategy()) {
        let cfg = FeeConfig::new(FEE_TO, BasisPoints::new(rate));
        let Ok((fee, net)) = FeeLedger::compute_fee(Amount::new(deposit), &cfg) else {
            panic!("fee computes for any deposit");
        };
        prop_assert_eq!(fee.get(), floor_bps(deposit, rate));
        prop_assert_eq!(fee.checked_add(&net), Some(Amount::new(deposit)));
    }

    #[test]
    fn prop_allocation_sums_to_net(net in any::<u128>(), weights in weights_strategy()) {
        let bps = weights.iter().copied().map(BasisPoints::new).collect();
        let Ok(dist) = Distribution::new(bps) else {
            panic!("strategy yields valid distributions");
        };
        let Ok(parts) = dist.allocate(Amount::new(net)) else {
            panic!("allocation succeeds");
        };
        prop_assert_eq!(Amount::checked_sum(&parts), Some(Amount::new(net)));
        for (part, weight) in parts.iter().zip(&weights).take(weights.len() - 1) {
            prop_assert_eq!(part.get(), floor_bps(net, *weight));
        }
    }

    #[test]
    fn prop_bad_distribution_rejected(
        weights in prop::collection::vec(0u32..=10_000, 1..=MAX_BRANCHES),
    ) {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        prop_assume!(total != 10_000);
        let result = Distribution::new(weights.into_iter().map(BasisPoints::new).collect());
        prop_assert_eq!(result, Err(RouterError::DistributionMismatch { total }));
    }

    #[test]
    fn prop_committed_swap_leaves_no_residual(
        deposit in 1_000_000u128..=1_000_000_000_000_000_000_000,
        rate in 0u32..=100,
        weights in weights_strategy(),
    ) {
        let reserve = 1_000_000_000_000_000_000_000_000u128;
        let (venues, mut ledger) = world(reserve, deposit);
        let policy = VenuePolicy::Fixed(VenueKind::UniswapV2);
        let router = SplitRouter::new(&venues, policy, ENGINE, WETH);
        let fees = FeeConfig::new(FEE_TO, BasisPoints::new(rate));
        let branches: Vec<SwapBranch> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                SwapBranch::new(target(i), pool(i), BasisPoints::new(*w), VenueKind::UniswapV2)
            })
            .collect();

        let ctx = CallContext::new(USER, Amount::new(deposit));
        let result = router.execute(&mut ledger, &fees, ctx, &branches);

        prop_assert_eq!(ledger.balance_of(ENGINE, WETH), Amount::ZERO);
        for i in 0..weights.len() {
            prop_assert_eq!(ledger.balance_of(ENGINE, target(i)), Amount::ZERO);
        }
        match result {
            Ok(receipt) => {
                prop_assert_eq!(ledger.balance_of(FEE_TO, WETH), receipt.fee);
                prop_assert_eq!(ledger.balance_of(USER, WETH), Amount::ZERO);
                prop_assert_eq!(receipt.total_in(), Some(receipt.net));
                for fill in &receipt.fills {
                    prop_assert_eq!(ledger.balance_of(USER, fill.target), fill.amount_out);
                }
            }
            // A dust branch can round to zero output; the call must then be a no-op.
            Err(_) => {
                prop_assert_eq!(ledger.balance_of(FEE_TO, WETH), Amount::ZERO);
                prop_assert_eq!(ledger.balance_of(USER, WETH), Amount::new(deposit));
            }
        }
    }

    #[test]
    fn prop_constant_product_invariant(
        r_in in 10_000u128..=10_000_000_000,
        r_out in 10_000u128..=10_000_000_000,
        amount in 1u128..=1_000_000,
    ) {
        let Ok(out) = constant_product::amount_out(
            Amount::new(amount),
            Amount::new(r_in),
            Amount::new(r_out),
            BasisPoints::new(30),
        ) else {
            return Ok(());
        };
        let k_before = U256::from(r_in) * U256::from(r_out);
        let k_after = U256::from(r_in + amount) * U256::from(r_out - out.get());
        prop_assert!(k_after >= k_before);
    }
}
