//! # Open Short
//!
//! Cost of opening a short: the trader sells `dy` bonds to the pool and
//! deposits enough base to cover the bonds' face value less the curve
//! proceeds, plus fees.

use serde::Serialize;
use strata_math::FixedPoint;
use strata_types::{StrataError, StrataResult};

use crate::checkpoint::flat_fee_proration;
use crate::config::PoolConfig;
use crate::state::PoolState;
use crate::yield_space::YieldSpace;

/// Parameters of a short quote beyond the pool snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenShortRequest {
    pub bond_amount: FixedPoint,
    /// Share price at the opening checkpoint; the current price when unset
    pub open_share_price: Option<FixedPoint>,
    /// Fraction of the flat fee charged
    pub flat_fee_proration: FixedPoint,
}

impl OpenShortRequest {
    /// A fresh short opened now: full flat fee, no back-paid interest
    pub fn new(bond_amount: FixedPoint) -> Self {
        Self {
            bond_amount,
            open_share_price: None,
            flat_fee_proration: FixedPoint::ONE,
        }
    }

    pub fn with_open_share_price(mut self, open_share_price: FixedPoint) -> Self {
        self.open_share_price = Some(open_share_price);
        self
    }

    /// Prorate the flat fee for a position opened at `open_time` and quoted at
    /// `current_time`
    pub fn at_checkpoint(mut self, config: &PoolConfig, open_time: u64, current_time: u64) -> StrataResult<Self> {
        self.flat_fee_proration = flat_fee_proration(config, open_time, current_time)?;
        Ok(self)
    }
}

/// Breakdown of an open-short quote. Share amounts are in vault shares,
/// `base_deposit` in base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShortQuote {
    /// Shares the curve pays for the bonds, before fees
    pub share_reserves_delta: FixedPoint,
    pub curve_fee: FixedPoint,
    /// Portion of the curve fee kept by governance
    pub governance_fee: FixedPoint,
    pub flat_fee: FixedPoint,
    pub share_deposit: FixedPoint,
    pub base_deposit: FixedPoint,
    pub spot_price: FixedPoint,
}

/// Base a trader must deposit to short `bond_amount` bonds
pub fn calculate_open_short(state: &PoolState, config: &PoolConfig, bond_amount: FixedPoint) -> StrataResult<FixedPoint> {
    quote_open_short(state, config, &OpenShortRequest::new(bond_amount)).map(|quote| quote.base_deposit)
}

/// Full open-short quote
///
/// # Errors
/// - `AmountTooSmall` if the bond amount is below the minimum transaction
/// - `NegativeInterest` if the curve would pay more than face value
/// - `BelowMinimumReserves` if the pool's share reserves would drop below
///   the floor once fees are returned to it
pub fn quote_open_short(state: &PoolState, config: &PoolConfig, request: &OpenShortRequest) -> StrataResult<OpenShortQuote> {
    let bond_amount = request.bond_amount;
    if bond_amount < config.minimum_transaction_amount {
        log::warn!(
            "Rejecting short of {} bonds: minimum is {}",
            bond_amount,
            config.minimum_transaction_amount
        );
        return Err(StrataError::amount_too_small(&bond_amount, &config.minimum_transaction_amount));
    }

    let curve = YieldSpace::from_pool(state, config)?;
    let share_price = state.share_price;
    let open_share_price = match request.open_share_price {
        Some(price) if !price.is_zero() => price,
        _ => share_price,
    };

    // Curve proceeds can never exceed the face value of the bonds
    let share_reserves_delta = curve.shares_out_given_bonds_in_down(bond_amount)?;
    let proceeds = share_reserves_delta.mul_up(share_price)?;
    if proceeds > bond_amount {
        return Err(StrataError::negative_interest(&proceeds, &bond_amount));
    }

    // Fees
    let spot_price = curve.spot_price()?;
    let curve_fee = FixedPoint::ONE
        .sub(spot_price)?
        .mul_up(config.fees.curve)?
        .mul_up(bond_amount)?
        .mul_div_up(FixedPoint::ONE, share_price)?;
    let governance_fee = curve_fee.mul_down(config.governance_lp_fee())?;
    let flat_fee = bond_amount
        .mul_div_up(config.fees.flat, share_price)?
        .mul_up(request.flat_fee_proration)?;

    // The pool keeps the curve fee net of governance's cut
    let pool_delta = share_reserves_delta.sub(curve_fee.sub(governance_fee)?)?;
    let remaining = state.share_reserves.sub(pool_delta).map_err(|_| {
        StrataError::below_minimum_reserves(&"negative", &config.minimum_share_reserves)
    })?;
    if remaining < config.minimum_share_reserves {
        log::warn!(
            "Short of {} bonds leaves {} shares, below the {} floor",
            bond_amount,
            remaining,
            config.minimum_share_reserves
        );
        return Err(StrataError::below_minimum_reserves(&remaining, &config.minimum_share_reserves));
    }

    // Face value in shares, grossed up by interest accrued since the opening
    // checkpoint, plus the flat fee, less the trader's net curve proceeds
    let face_value = bond_amount.mul_div_up(share_price, open_share_price.mul_down(share_price)?)?;
    let share_deposit = face_value
        .add(flat_fee)?
        .add(curve_fee)?
        .sub(share_reserves_delta)?;
    let base_deposit = share_deposit.mul_up(share_price)?;

    log::trace!(
        "quote_open_short: dy={} dz={} curve_fee={} flat_fee={} deposit={}",
        bond_amount,
        share_reserves_delta,
        curve_fee,
        flat_fee,
        base_deposit
    );

    Ok(OpenShortQuote {
        share_reserves_delta,
        curve_fee,
        governance_fee,
        flat_fee,
        share_deposit,
        base_deposit,
        spot_price,
    })
}
