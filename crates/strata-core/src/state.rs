//! # Pool State
//!
//! A caller-supplied snapshot of the pool's reserves. The engine reads it and
//! never keeps it.

use ethnum::I256;
use strata_math::{i256_to_u256, parse_signed, u256_to_i256, FixedPoint};
use strata_types::{PoolInfoRecord, StrataError, StrataResult};

use crate::config::PoolConfig;

/// Snapshot of mutable pool reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub share_reserves: FixedPoint,
    /// Signed correction subtracted from share reserves (ζ)
    pub share_adjustment: I256,
    pub zombie_share_reserves: FixedPoint,
    pub bond_reserves: FixedPoint,
    pub lp_total_supply: FixedPoint,
    /// Vault share price (c)
    pub share_price: FixedPoint,
    pub longs_outstanding: FixedPoint,
    pub long_average_maturity_time: FixedPoint,
    pub shorts_outstanding: FixedPoint,
    pub short_average_maturity_time: FixedPoint,
    pub long_exposure: FixedPoint,
    pub withdrawal_shares_ready_to_withdraw: FixedPoint,
    pub withdrawal_shares_proceeds: FixedPoint,
    pub lp_share_price: FixedPoint,
}

impl PoolState {
    /// Share reserves net of the share adjustment (`z − ζ`)
    ///
    /// # Errors
    /// `Underflow` if the adjustment exceeds the reserves.
    pub fn effective_share_reserves(&self) -> StrataResult<FixedPoint> {
        let reserves = u256_to_i256(self.share_reserves.raw(), "effective share reserves")?;
        let effective = reserves.checked_sub(self.share_adjustment).ok_or_else(|| {
            StrataError::overflow("effective share reserves", &[&reserves, &self.share_adjustment])
        })?;
        if effective < I256::ZERO {
            return Err(StrataError::underflow(
                "effective share reserves",
                &[&self.share_reserves, &self.share_adjustment],
            ));
        }
        i256_to_u256(effective, "effective share reserves").map(FixedPoint::from_raw)
    }

    /// Check that the snapshot can be priced against `config`
    ///
    /// Returns the effective share reserves on success.
    pub fn check_curve_inputs(&self, config: &PoolConfig) -> StrataResult<FixedPoint> {
        let effective = self.effective_share_reserves()?;
        if effective.is_zero() {
            return Err(StrataError::degenerate_curve("effective share reserves are zero"));
        }
        if self.bond_reserves.is_zero() {
            return Err(StrataError::degenerate_curve("bond reserves are zero"));
        }
        if self.share_price.is_zero() {
            return Err(StrataError::degenerate_curve("share price is zero"));
        }
        if config.time_stretch.is_zero() {
            return Err(StrataError::degenerate_curve("time stretch is zero"));
        }
        if self.share_reserves < config.minimum_share_reserves {
            return Err(StrataError::below_minimum_reserves(
                &self.share_reserves,
                &config.minimum_share_reserves,
            ));
        }
        Ok(effective)
    }

    /// Shares left over once long exposure and the reserve floor are covered,
    /// `z − exposure / c − z_min`
    ///
    /// # Errors
    /// `Underflow` if the pool is insolvent.
    pub fn solvency(&self, config: &PoolConfig) -> StrataResult<FixedPoint> {
        let exposure = self.long_exposure.div(self.share_price)?;
        self.share_reserves
            .sub(exposure)?
            .sub(config.minimum_share_reserves)
    }
}

impl TryFrom<&PoolInfoRecord> for PoolState {
    type Error = StrataError;

    fn try_from(record: &PoolInfoRecord) -> Result<Self, Self::Error> {
        Ok(PoolState {
            share_reserves: FixedPoint::parse("shareReserves", &record.share_reserves)?,
            share_adjustment: parse_signed("shareAdjustment", &record.share_adjustment)?,
            zombie_share_reserves: FixedPoint::parse("zombieShareReserves", &record.zombie_share_reserves)?,
            bond_reserves: FixedPoint::parse("bondReserves", &record.bond_reserves)?,
            lp_total_supply: FixedPoint::parse("lpTotalSupply", &record.lp_total_supply)?,
            share_price: FixedPoint::parse("sharePrice", &record.share_price)?,
            longs_outstanding: FixedPoint::parse("longsOutstanding", &record.longs_outstanding)?,
            long_average_maturity_time: FixedPoint::parse(
                "longAverageMaturityTime",
                &record.long_average_maturity_time,
            )?,
            shorts_outstanding: FixedPoint::parse("shortsOutstanding", &record.shorts_outstanding)?,
            short_average_maturity_time: FixedPoint::parse(
                "shortAverageMaturityTime",
                &record.short_average_maturity_time,
            )?,
            long_exposure: FixedPoint::parse("longExposure", &record.long_exposure)?,
            withdrawal_shares_ready_to_withdraw: FixedPoint::parse(
                "withdrawalSharesReadyToWithdraw",
                &record.withdrawal_shares_ready_to_withdraw,
            )?,
            withdrawal_shares_proceeds: FixedPoint::parse(
                "withdrawalSharesProceeds",
                &record.withdrawal_shares_proceeds,
            )?,
            lp_share_price: FixedPoint::parse("lpSharePrice", &record.lp_share_price)?,
        })
    }
}

impl TryFrom<PoolInfoRecord> for PoolState {
    type Error = StrataError;

    fn try_from(record: PoolInfoRecord) -> Result<Self, Self::Error> {
        PoolState::try_from(&record)
    }
}
