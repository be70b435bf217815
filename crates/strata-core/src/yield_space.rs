//! # YieldSpace Curve
//!
//! The constant-power invariant
//!
//! ```text
//! k = (c / μ) · (μ · z)^(1 − t) + y^(1 − t)
//! ```
//!
//! where `z` is the effective share reserves, `y` the bond reserves, `c` the
//! share price, `μ` the initial share price and `t` the time stretch. Each
//! trade direction solves the invariant in closed form for the complementary
//! reserve. Rounding is chosen per direction so the pool never comes out
//! short: amounts paid out round down, amounts paid in round up.

use ethnum::I256;
use strata_math::FixedPoint;
use strata_types::{StrataError, StrataResult};

use crate::config::PoolConfig;
use crate::state::PoolState;

/// Curve parameters extracted from a pool snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldSpace {
    /// Effective share reserves (z)
    pub share_reserves: FixedPoint,
    /// Bond reserves (y)
    pub bond_reserves: FixedPoint,
    /// Share price (c)
    pub share_price: FixedPoint,
    /// Initial share price (μ)
    pub initial_share_price: FixedPoint,
    /// Time stretch (t)
    pub time_stretch: FixedPoint,
}

impl YieldSpace {
    pub fn new(
        share_reserves: FixedPoint,
        bond_reserves: FixedPoint,
        share_price: FixedPoint,
        initial_share_price: FixedPoint,
        time_stretch: FixedPoint,
    ) -> StrataResult<Self> {
        if share_reserves.is_zero() || bond_reserves.is_zero() {
            return Err(StrataError::degenerate_curve("reserves are zero"));
        }
        if share_price.is_zero() || initial_share_price.is_zero() {
            return Err(StrataError::degenerate_curve("share price is zero"));
        }
        if time_stretch.is_zero() || time_stretch >= FixedPoint::ONE {
            return Err(StrataError::degenerate_curve("time stretch outside (0, 1)"));
        }
        Ok(Self {
            share_reserves,
            bond_reserves,
            share_price,
            initial_share_price,
            time_stretch,
        })
    }

    /// Build the curve for a pool, checking the reserve floor first
    pub fn from_pool(state: &PoolState, config: &PoolConfig) -> StrataResult<Self> {
        let effective = state.check_curve_inputs(config)?;
        Self::new(
            effective,
            state.bond_reserves,
            state.share_price,
            config.initial_share_price,
            config.time_stretch,
        )
    }

    /// `1 − t`, the invariant's exponent
    fn exponent(&self) -> StrataResult<FixedPoint> {
        FixedPoint::ONE.sub(self.time_stretch)
    }

    // ========================================================================
    // Invariant
    // ========================================================================

    /// The invariant `k`, rounded up
    pub fn k_up(&self) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;
        let mu_z = self.initial_share_price.mul_up(self.share_reserves)?;
        let share_term = self.share_price.mul_div_up(mu_z.pow(t)?, self.initial_share_price)?;
        share_term.add(self.bond_reserves.pow(t)?)
    }

    /// The invariant `k`, rounded down
    pub fn k_down(&self) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;
        let mu_z = self.initial_share_price.mul_down(self.share_reserves)?;
        let share_term = self.share_price.mul_div_down(mu_z.pow(t)?, self.initial_share_price)?;
        share_term.add(self.bond_reserves.pow(t)?)
    }

    /// Spot price of a bond in base: `(μ · z / y)^t`
    pub fn spot_price(&self) -> StrataResult<FixedPoint> {
        self.initial_share_price
            .mul_down(self.share_reserves)?
            .div_down(self.bond_reserves)?
            .pow(self.time_stretch)
    }

    // ========================================================================
    // Trade Directions
    // ========================================================================

    /// Shares the pool pays out when `bond_amount` bonds are sold to it
    ///
    /// # Errors
    /// `DegenerateCurve` if the curve cannot absorb that many bonds.
    pub fn shares_out_given_bonds_in_down(&self, bond_amount: FixedPoint) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        // The shares left in the pool must be rounded up so the payout is
        // rounded down.
        let k = self.k_up()?;
        let bond_term = self.bond_reserves.add(bond_amount)?.pow(t)?;
        if k < bond_term {
            return Err(StrataError::degenerate_curve("bond amount exceeds curve capacity"));
        }

        let mut z = k.sub(bond_term)?.mul_div_up(self.initial_share_price, self.share_price)?;
        z = if z >= FixedPoint::ONE {
            z.pow(FixedPoint::ONE.div_up(t)?)?
        } else {
            z.pow(FixedPoint::ONE.div_down(t)?)?
        };
        z = z.div_up(self.initial_share_price)?;

        log::trace!(
            "shares_out_given_bonds_in_down: dy={} k={} z'={}",
            bond_amount,
            k,
            z
        );

        // Rounding can leave the new reserves at or above the old ones
        if self.share_reserves > z {
            self.share_reserves.sub(z)
        } else {
            Ok(FixedPoint::ZERO)
        }
    }

    /// Bonds the pool pays out when `share_amount` shares are paid in
    pub fn bonds_out_given_shares_in_down(&self, share_amount: FixedPoint) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_down()?;
        let mu_z = self.initial_share_price.mul_up(self.share_reserves.add(share_amount)?)?;
        let share_term = self.share_price.mul_div_up(mu_z.pow(t)?, self.initial_share_price)?;
        if k < share_term {
            return Err(StrataError::degenerate_curve("share amount exceeds curve capacity"));
        }

        let mut y = k.sub(share_term)?;
        y = if y >= FixedPoint::ONE {
            y.pow(FixedPoint::ONE.div_up(t)?)?
        } else {
            y.pow(FixedPoint::ONE.div_down(t)?)?
        };

        log::trace!("bonds_out_given_shares_in_down: dz={} k={} y'={}", share_amount, k, y);

        self.bond_reserves.sub(y)
    }

    /// Shares a trader pays in to buy `bond_amount` bonds, rounded up
    pub fn shares_in_given_bonds_out_up(&self, bond_amount: FixedPoint) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_up()?;
        let bond_term = self.bond_reserves.sub(bond_amount)?.pow(t)?;
        let mut z = k.sub(bond_term)?.mul_div_up(self.initial_share_price, self.share_price)?;
        z = if z >= FixedPoint::ONE {
            z.pow(FixedPoint::ONE.div_up(t)?)?
        } else {
            z.pow(FixedPoint::ONE.div_down(t)?)?
        };
        z = z.div_up(self.initial_share_price)?;

        log::trace!("shares_in_given_bonds_out_up: dy={} k={} z'={}", bond_amount, k, z);

        z.sub(self.share_reserves)
    }

    /// Shares a trader pays in to buy `bond_amount` bonds, rounded down
    pub fn shares_in_given_bonds_out_down(&self, bond_amount: FixedPoint) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_down()?;
        let bond_term = self.bond_reserves.sub(bond_amount)?.pow(t)?;
        let mut z = k.sub(bond_term)?.mul_div_down(self.initial_share_price, self.share_price)?;
        z = if z >= FixedPoint::ONE {
            z.pow(FixedPoint::ONE.div_down(t)?)?
        } else {
            z.pow(FixedPoint::ONE.div_up(t)?)?
        };
        z = z.div_down(self.initial_share_price)?;

        log::trace!("shares_in_given_bonds_out_down: dy={} k={} z'={}", bond_amount, k, z);

        z.sub(self.share_reserves)
    }

    // ========================================================================
    // Trade Bounds
    // ========================================================================

    /// Largest share payment before the spot price reaches par
    ///
    /// Solves for the reserves where `μ · z = y`.
    pub fn max_buy_shares_in(&self) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_down()?;
        let mut z = k.div_down(self.share_price.div_up(self.initial_share_price)?.add(FixedPoint::ONE)?)?;
        z = if z >= FixedPoint::ONE {
            z.pow(FixedPoint::ONE.div_down(t)?)?
        } else {
            z.pow(FixedPoint::ONE.div_up(t)?)?
        };
        z = z.div_down(self.initial_share_price)?;

        z.sub(self.share_reserves)
    }

    /// Largest bond purchase before the spot price reaches par
    pub fn max_buy_bonds_out(&self) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_up()?;
        let mut y = k.div_up(self.share_price.div_down(self.initial_share_price)?.add(FixedPoint::ONE)?)?;
        y = if y >= FixedPoint::ONE {
            y.pow(FixedPoint::ONE.div_up(t)?)?
        } else {
            y.pow(FixedPoint::ONE.div_down(t)?)?
        };

        self.bond_reserves.sub(y)
    }

    /// Largest bond sale that leaves at least `minimum_share_reserves`
    /// effective shares in the pool
    ///
    /// Returns zero when the pool already sits at or under that level.
    pub fn max_sell_bonds_in(&self, minimum_share_reserves: FixedPoint) -> StrataResult<FixedPoint> {
        let t = self.exponent()?;

        let k = self.k_down()?;
        let mu_z = self.initial_share_price.mul_up(minimum_share_reserves)?;
        let share_term = self.share_price.mul_div_up(mu_z.pow(t)?, self.initial_share_price)?;
        if k <= share_term {
            return Ok(FixedPoint::ZERO);
        }

        let mut y = k.sub(share_term)?;
        y = if y >= FixedPoint::ONE {
            y.pow(FixedPoint::ONE.div_down(t)?)?
        } else {
            y.pow(FixedPoint::ONE.div_up(t)?)?
        };

        if y > self.bond_reserves {
            y.sub(self.bond_reserves)
        } else {
            Ok(FixedPoint::ZERO)
        }
    }
}

/// Largest bond sale the pool accepts without breaching its reserve floor
///
/// A negative share adjustment raises the effective floor by `|ζ|` so the
/// raw share reserves stay above `minimum_share_reserves`.
pub fn max_sell(state: &PoolState, config: &PoolConfig) -> StrataResult<FixedPoint> {
    let curve = YieldSpace::from_pool(state, config)?;
    let minimum = if state.share_adjustment < I256::ZERO {
        let magnitude = FixedPoint::from_raw(state.share_adjustment.unsigned_abs());
        config.minimum_share_reserves.add(magnitude)?
    } else {
        config.minimum_share_reserves
    };
    curve.max_sell_bonds_in(minimum)
}

/// Shares removed from the pool when `bond_amount` bonds are sold to it
///
/// # Errors
/// `BelowMinimumReserves` if paying the shares out would leave the pool's
/// share reserves under the configured floor. Landing exactly on the floor
/// is allowed.
pub fn share_reserves_delta(
    state: &PoolState,
    config: &PoolConfig,
    bond_amount: FixedPoint,
) -> StrataResult<FixedPoint> {
    let curve = YieldSpace::from_pool(state, config)?;
    let delta = curve.shares_out_given_bonds_in_down(bond_amount)?;

    let remaining = state.share_reserves.sub(delta).map_err(|_| {
        StrataError::below_minimum_reserves(&"negative", &config.minimum_share_reserves)
    })?;
    if remaining < config.minimum_share_reserves {
        log::warn!(
            "Selling {} bonds leaves {} shares, below the {} floor",
            bond_amount,
            remaining,
            config.minimum_share_reserves
        );
        return Err(StrataError::below_minimum_reserves(&remaining, &config.minimum_share_reserves));
    }
    Ok(delta)
}
