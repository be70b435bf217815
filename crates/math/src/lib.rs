/// Fixed-point mathematics for the Strata pricing engine
///
/// This crate provides checked 256-bit arithmetic, the 18-decimal
/// `FixedPoint` type, and the `ln`/`exp` kernels behind its fractional power.

pub mod fixed_point;
pub mod log_exp;
pub mod safe;

// Re-export commonly used functions
pub use fixed_point::*;
pub use log_exp::*;
pub use safe::*;
