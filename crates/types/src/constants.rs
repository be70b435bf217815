/// Protocol constants used across the Strata engine

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Number of decimal places carried by every fixed-point quantity
pub const DECIMALS: u32 = 18;

/// Fixed-point scale factor: 10^18 represents 1.0
pub const ONE_18: u128 = 1_000_000_000_000_000_000;

// ============================================================================
// Time Constants
// ============================================================================

/// Seconds in a (365 day) year, the annualisation basis for rates
pub const SECONDS_PER_YEAR: u64 = 60 * 60 * 24 * 365;

// ============================================================================
// Time-Stretch Calibration
// ============================================================================

/// Numerator of the time-stretch calibration curve (5.24592)
pub const TIME_STRETCH_NUMERATOR: u128 = 5_245_920_000_000_000_000;

/// Rate coefficient of the time-stretch calibration curve (0.04665)
pub const TIME_STRETCH_RATE_COEFFICIENT: u128 = 46_650_000_000_000_000;

/// Rates are expressed in percent when calibrating the time stretch
pub const TIME_STRETCH_RATE_SCALE: u128 = 100;

// ============================================================================
// Transcendental Bounds
// ============================================================================

/// exp(x) rounds to zero at or below this argument (≈ ln(0.5e-18))
pub const EXP_MIN_ARGUMENT: i128 = -42_139_678_854_452_767_551;

/// exp(x) no longer fits a signed 256-bit integer at or above this argument
pub const EXP_MAX_ARGUMENT: i128 = 135_305_999_368_893_231_589;
