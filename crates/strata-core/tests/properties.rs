//! # Property Tests
//!
//! Behavioural properties of the pricing functions over randomized pools.

use ethnum::U256;
use proptest::prelude::*;
use strata_core::*;

const ONE: u128 = 1_000_000_000_000_000_000;

fn fp(raw: u128) -> FixedPoint {
    FixedPoint::from_raw_u128(raw)
}

fn config(time_stretch: u128, minimum_transaction_amount: u128) -> PoolConfig {
    PoolConfig {
        initial_share_price: FixedPoint::ONE,
        minimum_share_reserves: fp(10 * ONE),
        minimum_transaction_amount: fp(minimum_transaction_amount),
        time_stretch: fp(time_stretch),
        position_duration: 604_800,
        checkpoint_duration: 3_600,
        fees: Fees {
            curve: fp(ONE / 10),
            flat: fp(ONE / 2_000),
            governance_lp: fp(ONE / 100),
            governance_zombie: fp(ONE / 10),
        },
    }
}

fn state(share_reserves: FixedPoint, bond_reserves: FixedPoint, share_price: FixedPoint) -> PoolState {
    PoolState {
        share_reserves,
        share_adjustment: Default::default(),
        zombie_share_reserves: FixedPoint::ZERO,
        bond_reserves,
        lp_total_supply: share_reserves,
        share_price,
        longs_outstanding: FixedPoint::ZERO,
        long_average_maturity_time: FixedPoint::ZERO,
        shorts_outstanding: FixedPoint::ZERO,
        short_average_maturity_time: FixedPoint::ZERO,
        long_exposure: FixedPoint::ZERO,
        withdrawal_shares_ready_to_withdraw: FixedPoint::ZERO,
        withdrawal_shares_proceeds: FixedPoint::ZERO,
        lp_share_price: FixedPoint::ONE,
    }
}

/// Pools between 10 thousand and 100 million shares with bond reserves 1% to
/// 100% above share reserves, so the spot price stays below par
fn priced_pool() -> impl Strategy<Value = (PoolState, PoolConfig)> {
    (
        10_000u128..100_000_000,
        ONE / 100..ONE,
        ONE..(ONE * 11 / 10),
        ONE / 100..ONE / 4,
    )
        .prop_map(|(whole_shares, premium, share_price, time_stretch)| {
            let shares = fp(whole_shares * ONE);
            let bonds = shares.mul_down(fp(ONE + premium)).unwrap();
            (state(shares, bonds, fp(share_price)), config(time_stretch, ONE / 1_000))
        })
}

#[test]
fn test_balanced_pool_prices_at_par() {
    let shares = fp(1_000_000 * ONE);
    let price = spot_price(&state(shares, shares, FixedPoint::ONE), &config(ONE / 10, ONE / 1_000)).unwrap();
    assert_eq!(price, FixedPoint::ONE);
}

proptest! {
    #[test]
    fn prop_spot_price_in_unit_interval((state, config) in priced_pool()) {
        let price = spot_price(&state, &config).unwrap();
        prop_assert!(price > FixedPoint::ZERO);
        prop_assert!(price <= FixedPoint::ONE);
    }

    #[test]
    fn prop_rate_decreases_with_price(low in 1u128..ONE, gap in 1u128..ONE) {
        let high = (low + gap).min(ONE);
        let low_rate = calculate_rate_given_fixed_price(fp(low), 604_800).unwrap();
        let high_rate = calculate_rate_given_fixed_price(fp(high), 604_800).unwrap();
        prop_assert!(low_rate >= high_rate);
        if high - low >= ONE / 1_000_000 {
            prop_assert!(low_rate > high_rate);
        }
    }

    #[test]
    fn prop_more_bonds_lower_price_higher_rate((state, config) in priced_pool(), extra in ONE..ONE * 1_000) {
        let mut heavier = state;
        heavier.bond_reserves = state.bond_reserves.add(fp(extra)).unwrap();

        prop_assert!(spot_price(&heavier, &config).unwrap() <= spot_price(&state, &config).unwrap());
        prop_assert!(spot_rate(&heavier, &config).unwrap() >= spot_rate(&state, &config).unwrap());
    }

    #[test]
    fn prop_open_short_increasing_in_amount((state, config) in priced_pool(), small in ONE / 1_000..ONE * 100, step in ONE / 10..ONE * 10) {
        let large = small + step;
        let cheap = calculate_open_short(&state, &config, fp(small)).unwrap();
        let dear = calculate_open_short(&state, &config, fp(large)).unwrap();
        prop_assert!(dear > cheap, "dy {} -> {}, dy {} -> {}", small, cheap, large, dear);
    }

    #[test]
    fn prop_calculators_are_idempotent((state, config) in priced_pool(), bond_amount in ONE / 1_000..ONE * 100) {
        prop_assert_eq!(spot_price(&state, &config).unwrap(), spot_price(&state, &config).unwrap());
        prop_assert_eq!(spot_rate(&state, &config).unwrap(), spot_rate(&state, &config).unwrap());
        let request = OpenShortRequest::new(fp(bond_amount));
        prop_assert_eq!(
            quote_open_short(&state, &config, &request).unwrap(),
            quote_open_short(&state, &config, &request).unwrap()
        );
    }

    #[test]
    fn prop_minimum_transaction_boundary((state, _) in priced_pool(), minimum in ONE / 1_000..ONE) {
        let config = config(44_463_125_629_060_298, minimum);
        prop_assert!(calculate_open_short(&state, &config, fp(minimum)).is_ok());
        let err = calculate_open_short(&state, &config, fp(minimum - 1)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::AmountTooSmall);
    }

    #[test]
    fn prop_doubling_near_max_overflows(offset in 0u128..u128::MAX) {
        let near_max = FixedPoint::from_raw(U256::MAX - U256::new(offset));
        let err = near_max.mul_down(FixedPoint::from_int(2).unwrap()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Overflow);
    }
}
