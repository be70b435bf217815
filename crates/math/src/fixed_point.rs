//! # Fixed-Point Arithmetic
//!
//! An 18-decimal fixed-point number backed by a 256-bit unsigned integer.
//! `FixedPoint(v)` represents `v / 10^18`.
//!
//! Every operation is checked: results that do not fit 256 bits fail with
//! `Overflow`, results that would be negative fail with `Underflow`. Nothing
//! wraps and nothing is clamped. Division truncates unless the `_up` variant is
//! used, which rounds towards positive infinity.

use std::fmt;
use std::str::FromStr;

use ethnum::{I256, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strata_types::{StrataError, StrataResult, DECIMALS, ONE_18};

use crate::log_exp::{exp, ln};
use crate::safe::*;

/// 18-decimal unsigned fixed-point number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct FixedPoint(U256);

impl FixedPoint {
    /// 0.0
    pub const ZERO: FixedPoint = FixedPoint(U256::ZERO);

    /// 1.0
    pub const ONE: FixedPoint = FixedPoint(U256::new(ONE_18));

    /// Largest representable value
    pub const MAX: FixedPoint = FixedPoint(U256::MAX);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Wrap a raw scaled integer (`raw / 10^18`)
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Wrap a raw scaled integer given as u128
    pub const fn from_raw_u128(raw: u128) -> Self {
        Self(U256::new(raw))
    }

    /// Scale a whole number: `from_int(5)` is 5.0
    pub fn from_int(value: u128) -> StrataResult<Self> {
        safe_mul_u256(U256::new(value), U256::new(ONE_18)).map(Self)
    }

    /// Parse a base-10 string of the raw scaled integer
    ///
    /// Only ASCII digits are accepted: no sign, no decimal point, no prefix.
    pub fn from_dec_str(value: &str) -> StrataResult<Self> {
        Self::parse("value", value)
    }

    /// Parse a base-10 raw string, naming `field` in any error
    pub fn parse(field: &str, value: &str) -> StrataResult<Self> {
        if value.is_empty() {
            return Err(StrataError::malformed(field, value, "empty string"));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StrataError::malformed(field, value, "expected an unsigned decimal integer"));
        }
        U256::from_str_radix(value, 10)
            .map(Self)
            .map_err(|_| StrataError::malformed(field, value, "exceeds 256 bits"))
    }

    /// The raw scaled integer
    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == U256::ZERO
    }

    // ========================================================================
    // Basic Arithmetic
    // ========================================================================

    pub fn add(self, other: Self) -> StrataResult<Self> {
        safe_add_u256(self.0, other.0).map(Self)
    }

    /// Subtraction; fails with `Underflow` rather than going negative
    pub fn sub(self, other: Self) -> StrataResult<Self> {
        safe_sub_u256(self.0, other.0).map(Self)
    }

    /// `self * other / d`, truncated
    pub fn mul_div_down(self, other: Self, d: Self) -> StrataResult<Self> {
        mul_div(self.0, other.0, d.0, Rounding::Down).map(Self)
    }

    /// `self * other / d`, rounded up
    pub fn mul_div_up(self, other: Self, d: Self) -> StrataResult<Self> {
        mul_div(self.0, other.0, d.0, Rounding::Up).map(Self)
    }

    /// Fixed-point product, truncated
    pub fn mul_down(self, other: Self) -> StrataResult<Self> {
        self.mul_div_down(other, Self::ONE)
    }

    /// Fixed-point product, rounded up
    pub fn mul_up(self, other: Self) -> StrataResult<Self> {
        self.mul_div_up(other, Self::ONE)
    }

    /// Fixed-point quotient, truncated
    pub fn div_down(self, other: Self) -> StrataResult<Self> {
        self.mul_div_down(Self::ONE, other)
    }

    /// Fixed-point quotient, rounded up
    pub fn div_up(self, other: Self) -> StrataResult<Self> {
        self.mul_div_up(Self::ONE, other)
    }

    /// Truncating product; alias of [`FixedPoint::mul_down`]
    pub fn mul(self, other: Self) -> StrataResult<Self> {
        self.mul_down(other)
    }

    /// Truncating quotient; alias of [`FixedPoint::div_down`]
    pub fn div(self, other: Self) -> StrataResult<Self> {
        self.div_down(other)
    }

    /// Multiply by a plain integer (no rescaling)
    pub fn mul_int(self, factor: u128) -> StrataResult<Self> {
        safe_mul_u256(self.0, U256::new(factor)).map(Self)
    }

    // ========================================================================
    // Powers
    // ========================================================================

    /// `self ^ exponent` for a fractional exponent, as `exp(exponent * ln(self))`
    ///
    /// `x^0 = 1` and `0^y = 0` (for `y > 0`) are handled before the logarithm.
    /// Base or exponent at or above 2^255 fails with `Overflow`, as does a
    /// result too large for the exponential.
    pub fn pow(self, exponent: Self) -> StrataResult<Self> {
        if exponent.is_zero() {
            return Ok(Self::ONE);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }

        let x = u256_to_i256(self.0, "pow base")?;
        let y = u256_to_i256(exponent.0, "pow exponent")?;

        let ln_x = ln(x)?;
        let y_ln_x = safe_mul_i256(y, ln_x)? / I256::new(ONE_18 as i128);

        let result = exp(y_ln_x).map_err(|e| match e {
            StrataError::Domain { .. } => StrataError::overflow("pow", &[&self, &exponent]),
            other => other,
        })?;
        i256_to_u256(result, "pow").map(Self)
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// Human-readable decimal form, e.g. `1.5` for a raw `1500000000000000000`
    pub fn to_decimal(self) -> String {
        let one = U256::new(ONE_18);
        let whole = self.0 / one;
        let (_, fraction) = (self.0 % one).into_words();
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", fraction, width = DECIMALS as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Parse a signed base-10 raw string (optional leading `-`), naming `field` in
/// any error
pub fn parse_signed(field: &str, value: &str) -> StrataResult<I256> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let magnitude = FixedPoint::parse(field, digits)?.raw();
    let signed = u256_to_i256(magnitude, field)
        .map_err(|_| StrataError::malformed(field, value, "exceeds signed 256-bit range"))?;
    Ok(if negative { -signed } else { signed })
}

impl fmt::Display for FixedPoint {
    /// Writes the raw scaled integer, the host's wire encoding
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FixedPoint {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl From<U256> for FixedPoint {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<FixedPoint> for U256 {
    fn from(value: FixedPoint) -> Self {
        value.0
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_dec_str(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_types::ErrorKind;

    fn fp(raw: u128) -> FixedPoint {
        FixedPoint::from_raw_u128(raw)
    }

    #[test]
    fn test_parse() {
        assert_eq!(FixedPoint::from_dec_str("1000000000000000000").unwrap(), FixedPoint::ONE);
        assert_eq!(
            FixedPoint::from_dec_str("10000000000000000000000000").unwrap(),
            FixedPoint::from_int(10_000_000).unwrap()
        );
        assert_eq!("0".parse::<FixedPoint>().unwrap(), FixedPoint::ZERO);

        for bad in ["", "-1", "+1", "1.5", "0x10", " 1", "abc"] {
            let err = FixedPoint::from_dec_str(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "input {:?}", bad);
        }

        // 2^256 does not fit
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(FixedPoint::from_dec_str(too_big).unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed("shareAdjustment", "0").unwrap(), I256::ZERO);
        assert_eq!(parse_signed("shareAdjustment", "-25").unwrap(), I256::new(-25));
        assert_eq!(parse_signed("shareAdjustment", "25").unwrap(), I256::new(25));
        assert!(parse_signed("shareAdjustment", "--25").is_err());
        assert!(parse_signed("shareAdjustment", "-").is_err());
    }

    #[test]
    fn test_display_and_decimal() {
        let value = fp(1_500_000_000_000_000_000);
        assert_eq!(value.to_string(), "1500000000000000000");
        assert_eq!(value.to_decimal(), "1.5");
        assert_eq!(FixedPoint::from_int(3).unwrap().to_decimal(), "3");
        assert_eq!(fp(1).to_decimal(), "0.000000000000000001");
    }

    #[test]
    fn test_rounding() {
        // 1 / 3
        let third_down = FixedPoint::ONE.div_down(fp(3_000_000_000_000_000_000)).unwrap();
        let third_up = FixedPoint::ONE.div_up(fp(3_000_000_000_000_000_000)).unwrap();
        assert_eq!(third_down, fp(333_333_333_333_333_333));
        assert_eq!(third_up, fp(333_333_333_333_333_334));

        // 1e-18 * 0.5
        assert_eq!(fp(1).mul_down(fp(500_000_000_000_000_000)).unwrap(), FixedPoint::ZERO);
        assert_eq!(fp(1).mul_up(fp(500_000_000_000_000_000)).unwrap(), fp(1));
    }

    #[test]
    fn test_truncating_aliases() {
        let two = FixedPoint::from_int(2).unwrap();
        let third = fp(333_333_333_333_333_333);
        assert_eq!(two.mul(third).unwrap(), two.mul_down(third).unwrap());
        assert_eq!(FixedPoint::ONE.div(fp(3_000_000_000_000_000_000)).unwrap(), third);
    }

    #[test]
    fn test_checked_failures() {
        assert_eq!(FixedPoint::ONE.sub(fp(1_000_000_000_000_000_001)).unwrap_err().kind(), ErrorKind::Underflow);
        assert_eq!(FixedPoint::MAX.add(fp(1)).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(FixedPoint::ONE.div_down(FixedPoint::ZERO).unwrap_err().kind(), ErrorKind::DivideByZero);
    }

    #[test]
    fn test_near_max_times_two_overflows() {
        let near_max = FixedPoint::from_raw(U256::MAX - U256::new(7));
        let two = FixedPoint::from_int(2).unwrap();
        assert_eq!(near_max.mul_down(two).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(near_max.mul_int(2).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(near_max.add(near_max).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_pow() {
        let two = FixedPoint::from_int(2).unwrap();
        let four = FixedPoint::from_int(4).unwrap();
        let half = fp(500_000_000_000_000_000);

        assert_eq!(two.pow(FixedPoint::ZERO).unwrap(), FixedPoint::ONE);
        assert_eq!(FixedPoint::ZERO.pow(half).unwrap(), FixedPoint::ZERO);
        assert_eq!(FixedPoint::ONE.pow(half).unwrap(), FixedPoint::ONE);
        assert_eq!(two.pow(half).unwrap(), fp(1_414_213_562_373_095_047));
        assert_eq!(four.pow(half).unwrap(), fp(1_999_999_999_999_999_999));
    }

    #[test]
    fn test_pow_too_large_is_overflow() {
        let base = FixedPoint::from_int(1_000_000_000_000).unwrap();
        let exponent = FixedPoint::from_int(20).unwrap();
        assert_eq!(base.pow(exponent).unwrap_err().kind(), ErrorKind::Overflow);

        // Just inside the range still works
        let exponent = FixedPoint::from_int(4).unwrap();
        assert!(base.pow(exponent).unwrap() > FixedPoint::from_int(999_999_999_999_999_999_999_999).unwrap());
    }

    #[test]
    fn test_pow_rejects_huge_base() {
        let huge = FixedPoint::from_raw(U256::MAX);
        assert_eq!(huge.pow(FixedPoint::ONE).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_serde_as_string() {
        let value = fp(44_463_125_629_060_298);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"44463125629060298\"");
        assert_eq!(serde_json::from_str::<FixedPoint>(&json).unwrap(), value);
        assert!(serde_json::from_str::<FixedPoint>("\"1.5\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_up_never_below_down(a in 0u128..u128::MAX, b in 1u128..u128::MAX) {
            let (a, b) = (fp(a), fp(b));
            let down = a.mul_down(b).unwrap();
            let up = a.mul_up(b).unwrap();
            prop_assert!(up >= down);
            prop_assert!(up.sub(down).unwrap() <= fp(1));

            let down = a.div_down(b).unwrap();
            let up = a.div_up(b).unwrap();
            prop_assert!(up >= down);
            prop_assert!(up.sub(down).unwrap() <= fp(1));
        }

        #[test]
        fn prop_parse_display_agree(raw in any::<u128>()) {
            let value = fp(raw);
            prop_assert_eq!(FixedPoint::from_dec_str(&value.to_string()).unwrap(), value);
        }
    }
}
