//! # Checkpoints
//!
//! Positions are bucketed into checkpoints of `checkpoint_duration` seconds.
//! A position opened during a checkpoint matures one position duration after
//! the checkpoint's start.

use strata_math::FixedPoint;
use strata_types::{StrataError, StrataResult};

use crate::config::PoolConfig;

/// Start of the checkpoint containing `time`
pub fn to_checkpoint(config: &PoolConfig, time: u64) -> StrataResult<u64> {
    if config.checkpoint_duration == 0 {
        return Err(StrataError::divide_by_zero("to_checkpoint: checkpoint duration is zero"));
    }
    Ok(time - time % config.checkpoint_duration)
}

/// Maturity of a position opened at `open_time`
pub fn maturity_time(config: &PoolConfig, open_time: u64) -> StrataResult<u64> {
    let checkpoint = to_checkpoint(config, open_time)?;
    checkpoint
        .checked_add(config.position_duration)
        .ok_or_else(|| StrataError::overflow("maturity_time", &[&checkpoint, &config.position_duration]))
}

/// Fraction of the term left before `maturity`, measured from the
/// checkpoint containing `current_time` and capped at 1
pub fn time_remaining_scaled(config: &PoolConfig, maturity: u64, current_time: u64) -> StrataResult<FixedPoint> {
    let latest = to_checkpoint(config, current_time)?;
    let remaining = maturity.saturating_sub(latest).min(config.position_duration);
    FixedPoint::from_raw_u128(remaining as u128).div_down(FixedPoint::from_raw_u128(config.position_duration as u128))
}

/// Share of the flat fee owed by a position opened at `open_time` and
/// quoted at `current_time`
///
/// A position quoted in its own opening checkpoint pays the full fee.
pub fn flat_fee_proration(config: &PoolConfig, open_time: u64, current_time: u64) -> StrataResult<FixedPoint> {
    let maturity = maturity_time(config, open_time)?;
    time_remaining_scaled(config, maturity, current_time)
}
