//! # Pool Configuration
//!
//! Immutable per-pool parameters, parsed once from the host's record.

use ethnum::U256;
use strata_math::FixedPoint;
use strata_types::{PoolConfigRecord, StrataError, StrataResult};

/// Fee schedule; every fee is a fraction where `ONE` is 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fees {
    pub curve: FixedPoint,
    pub flat: FixedPoint,
    pub governance_lp: FixedPoint,
    pub governance_zombie: FixedPoint,
}

/// Immutable pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Share price when the pool was initialized (μ)
    pub initial_share_price: FixedPoint,
    pub minimum_share_reserves: FixedPoint,
    pub minimum_transaction_amount: FixedPoint,
    /// Curve exponent; must be in (0, 1)
    pub time_stretch: FixedPoint,
    /// Term of a position in seconds
    pub position_duration: u64,
    /// Checkpoint interval in seconds
    pub checkpoint_duration: u64,
    pub fees: Fees,
}

impl PoolConfig {
    /// Check the configuration invariants
    ///
    /// A zero time stretch is a `DegenerateCurve`; every other violation is
    /// reported as `MalformedInput` against the offending field.
    pub fn validate(&self) -> StrataResult<()> {
        if self.time_stretch.is_zero() {
            return Err(StrataError::degenerate_curve("time stretch is zero"));
        }
        if self.time_stretch >= FixedPoint::ONE {
            return Err(StrataError::malformed(
                "timeStretch",
                &self.time_stretch.to_string(),
                "must be below 1.0",
            ));
        }
        if self.initial_share_price.is_zero() {
            return Err(StrataError::malformed("initialSharePrice", "0", "must be positive"));
        }
        if self.position_duration == 0 {
            return Err(StrataError::malformed("positionDuration", "0", "must be positive"));
        }
        if self.checkpoint_duration == 0 {
            return Err(StrataError::malformed("checkpointDuration", "0", "must be positive"));
        }
        if self.position_duration % self.checkpoint_duration != 0 {
            log::warn!(
                "Position duration {}s is not a multiple of checkpoint duration {}s",
                self.position_duration,
                self.checkpoint_duration
            );
        }

        let fees = [
            ("fees.curve", self.fees.curve),
            ("fees.flat", self.fees.flat),
            ("fees.governanceLP", self.fees.governance_lp),
            ("fees.governanceZombie", self.fees.governance_zombie),
        ];
        for (field, fee) in fees {
            if fee > FixedPoint::ONE {
                return Err(StrataError::malformed(field, &fee.to_string(), "fee above 1.0"));
            }
        }

        Ok(())
    }

    pub fn governance_lp_fee(&self) -> FixedPoint {
        self.fees.governance_lp
    }

    /// Position duration as a raw fixed-point value (seconds, unscaled)
    pub fn position_duration_raw(&self) -> FixedPoint {
        FixedPoint::from_raw(U256::from(self.position_duration))
    }
}

/// Parse a whole number of seconds
pub(crate) fn parse_seconds(field: &str, value: &str) -> StrataResult<u64> {
    let raw = FixedPoint::parse(field, value)?.raw();
    if raw > U256::from(u64::MAX) {
        return Err(StrataError::malformed(field, value, "exceeds 64 bits"));
    }
    let (_, lo) = raw.into_words();
    Ok(lo as u64)
}

impl TryFrom<&PoolConfigRecord> for PoolConfig {
    type Error = StrataError;

    fn try_from(record: &PoolConfigRecord) -> Result<Self, Self::Error> {
        let config = PoolConfig {
            initial_share_price: FixedPoint::parse("initialSharePrice", &record.initial_share_price)?,
            minimum_share_reserves: FixedPoint::parse("minimumShareReserves", &record.minimum_share_reserves)?,
            minimum_transaction_amount: FixedPoint::parse(
                "minimumTransactionAmount",
                &record.minimum_transaction_amount,
            )?,
            time_stretch: FixedPoint::parse("timeStretch", &record.time_stretch)?,
            position_duration: parse_seconds("positionDuration", &record.position_duration)?,
            checkpoint_duration: parse_seconds("checkpointDuration", &record.checkpoint_duration)?,
            fees: Fees {
                curve: FixedPoint::parse("fees.curve", &record.fees.curve)?,
                flat: FixedPoint::parse("fees.flat", &record.fees.flat)?,
                governance_lp: FixedPoint::parse("fees.governanceLP", &record.fees.governance_lp)?,
                governance_zombie: FixedPoint::parse(
                    "fees.governanceZombie",
                    &record.fees.governance_zombie,
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<PoolConfigRecord> for PoolConfig {
    type Error = StrataError;

    fn try_from(record: PoolConfigRecord) -> Result<Self, Self::Error> {
        PoolConfig::try_from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::{ErrorKind, FeesRecord};

    fn record() -> PoolConfigRecord {
        PoolConfigRecord {
            initial_share_price: "1000000000000000000".to_string(),
            minimum_share_reserves: "10000000000000000000".to_string(),
            minimum_transaction_amount: "1000000000000000".to_string(),
            time_stretch: "44463125629060298".to_string(),
            position_duration: "604800".to_string(),
            checkpoint_duration: "3600".to_string(),
            fees: FeesRecord {
                curve: "100000000000000000".to_string(),
                flat: "500000000000000".to_string(),
                governance_lp: "10000000000000000".to_string(),
                governance_zombie: "100000000000000000".to_string(),
            },
        }
    }

    #[test]
    fn test_from_record() {
        let config = PoolConfig::try_from(&record()).unwrap();
        assert_eq!(config.initial_share_price, FixedPoint::ONE);
        assert_eq!(config.time_stretch, FixedPoint::from_raw_u128(44_463_125_629_060_298));
        assert_eq!(config.position_duration, 604_800);
        assert_eq!(config.checkpoint_duration, 3_600);
        assert_eq!(config.governance_lp_fee(), FixedPoint::from_raw_u128(10_000_000_000_000_000));
        assert_eq!(config.position_duration_raw().raw(), U256::new(604_800));
    }

    #[test]
    fn test_malformed_field_is_named() {
        let mut bad = record();
        bad.fees.flat = "0.0005".to_string();
        match PoolConfig::try_from(&bad).unwrap_err() {
            StrataError::MalformedInput { field, .. } => assert_eq!(field, "fees.flat"),
            other => panic!("unexpected error: {other}"),
        }

        let mut bad = record();
        bad.position_duration = "-1".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::MalformedInput);

        let mut bad = record();
        bad.checkpoint_duration = "18446744073709551616".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_validation() {
        let mut bad = record();
        bad.time_stretch = "0".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::DegenerateCurve);

        let mut bad = record();
        bad.time_stretch = "1000000000000000000".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::MalformedInput);

        let mut bad = record();
        bad.fees.curve = "1000000000000000001".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::MalformedInput);

        let mut bad = record();
        bad.checkpoint_duration = "0".to_string();
        assert_eq!(PoolConfig::try_from(&bad).unwrap_err().kind(), ErrorKind::MalformedInput);

        // Not enforced, only logged
        let mut uneven = record();
        uneven.checkpoint_duration = "7000".to_string();
        assert!(PoolConfig::try_from(&uneven).is_ok());
    }
}
