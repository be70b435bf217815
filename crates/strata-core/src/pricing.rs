//! # Spot Price and Rate
//!
//! Zero-size prices derived from reserves, plus the calibration helpers used
//! to seed a pool at a target rate.

use ethnum::U256;
use strata_math::FixedPoint;
use strata_types::{
    StrataResult, SECONDS_PER_YEAR, TIME_STRETCH_NUMERATOR, TIME_STRETCH_RATE_COEFFICIENT,
    TIME_STRETCH_RATE_SCALE,
};

use crate::config::PoolConfig;
use crate::state::PoolState;
use crate::yield_space::YieldSpace;

/// Term length as a fraction of a year
pub fn annualized_duration(position_duration: u64) -> StrataResult<FixedPoint> {
    let duration = FixedPoint::from_raw(U256::from(position_duration));
    let year = FixedPoint::from_raw(U256::from(SECONDS_PER_YEAR));
    duration.div_down(year)
}

/// Price of one bond in base, `((μ · z) / y)^t`
pub fn spot_price(state: &PoolState, config: &PoolConfig) -> StrataResult<FixedPoint> {
    YieldSpace::from_pool(state, config)?.spot_price()
}

/// Highest spot price a long can push the pool to once fees are charged
///
/// `1 / (1 + φ_curve · (1/p − 1) · (1 − φ_gov))`
pub fn max_spot_price(state: &PoolState, config: &PoolConfig) -> StrataResult<FixedPoint> {
    let price = spot_price(state, config)?;
    let discount = FixedPoint::ONE.div_up(price)?.sub(FixedPoint::ONE)?;
    let fee_drag = config
        .fees
        .curve
        .mul_up(discount)?
        .mul_up(FixedPoint::ONE.sub(config.governance_lp_fee())?)?;
    FixedPoint::ONE.div_down(FixedPoint::ONE.add(fee_drag)?)
}

/// Annualized rate implied by the spot price, `(1 − p) / (p · term)`
pub fn spot_rate(state: &PoolState, config: &PoolConfig) -> StrataResult<FixedPoint> {
    let price = spot_price(state, config)?;
    calculate_rate_given_fixed_price(price, config.position_duration)
}

/// Annualized rate of a bond bought at `price` and held for the full term
///
/// # Errors
/// `DivideByZero` for a zero price. A price above 1.0 has no positive rate
/// and fails with `Underflow`.
pub fn calculate_rate_given_fixed_price(price: FixedPoint, position_duration: u64) -> StrataResult<FixedPoint> {
    let term = annualized_duration(position_duration)?;
    FixedPoint::ONE.sub(price)?.div_down(price.mul_up(term)?)
}

/// Time stretch calibrated for a target annual `rate`
///
/// `1 / (5.24592 / (0.04665 · rate · 100))`
pub fn calculate_time_stretch(rate: FixedPoint) -> StrataResult<FixedPoint> {
    let rate_percent = rate.mul_int(TIME_STRETCH_RATE_SCALE)?;
    let denominator = FixedPoint::from_raw_u128(TIME_STRETCH_RATE_COEFFICIENT).mul_down(rate_percent)?;
    let inverse = FixedPoint::from_raw_u128(TIME_STRETCH_NUMERATOR).div_down(denominator)?;
    FixedPoint::ONE.div_down(inverse)
}

/// Bond reserves that put a pool with `effective_share_reserves` at `apr`
///
/// `μ · z · (1 + apr · term)^(1 / t)`
pub fn calculate_bonds_given_shares_and_rate(
    effective_share_reserves: FixedPoint,
    initial_share_price: FixedPoint,
    apr: FixedPoint,
    position_duration: u64,
    time_stretch: FixedPoint,
) -> StrataResult<FixedPoint> {
    let term = annualized_duration(position_duration)?;
    let growth = FixedPoint::ONE
        .add(apr.mul_down(term)?)?
        .pow(FixedPoint::ONE.div_up(time_stretch)?)?;
    initial_share_price.mul_down(effective_share_reserves)?.mul_down(growth)
}
