/// Safe arithmetic operations with overflow protection
///
/// All operations return errors instead of panicking or wrapping, which is the
/// contract every fixed-point quantity in the engine relies on.

use ethnum::{I256, U256};
use strata_types::{StrataError, StrataResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

// ============================================================================
// Safe Basic Arithmetic
// ============================================================================

/// Safe addition for U256 values
pub fn safe_add_u256(a: U256, b: U256) -> StrataResult<U256> {
    a.checked_add(b)
        .ok_or_else(|| StrataError::overflow("u256 addition", &[&a, &b]))
}

/// Safe subtraction for U256 values
pub fn safe_sub_u256(a: U256, b: U256) -> StrataResult<U256> {
    a.checked_sub(b)
        .ok_or_else(|| StrataError::underflow("u256 subtraction", &[&a, &b]))
}

/// Safe multiplication for U256 values
pub fn safe_mul_u256(a: U256, b: U256) -> StrataResult<U256> {
    a.checked_mul(b)
        .ok_or_else(|| StrataError::overflow("u256 multiplication", &[&a, &b]))
}

/// Safe division for U256 values (truncating)
pub fn safe_div_u256(a: U256, b: U256) -> StrataResult<U256> {
    if b == U256::ZERO {
        return Err(StrataError::divide_by_zero(&format!("u256 division: {} / {}", a, b)));
    }
    Ok(a / b)
}

/// Safe multiplication for I256 values
pub fn safe_mul_i256(a: I256, b: I256) -> StrataResult<I256> {
    a.checked_mul(b)
        .ok_or_else(|| StrataError::overflow("i256 multiplication", &[&a, &b]))
}

// ============================================================================
// Multiply-Divide
// ============================================================================

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
///
/// The product must fit in 256 bits; there is no 512-bit intermediate.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> StrataResult<U256> {
    if denominator == U256::ZERO {
        return Err(StrataError::divide_by_zero(&format!("mul_div: {} * {} / 0", a, b)));
    }

    let product = a
        .checked_mul(b)
        .ok_or_else(|| StrataError::overflow("mul_div", &[&a, &b, &denominator]))?;

    match rounding {
        Rounding::Down => Ok(product / denominator),
        Rounding::Up => {
            if product == U256::ZERO {
                Ok(U256::ZERO)
            } else {
                // (product - 1) / d + 1 cannot overflow
                Ok((product - U256::ONE) / denominator + U256::ONE)
            }
        }
    }
}

// ============================================================================
// Signed/Unsigned Conversions
// ============================================================================

/// Reinterpret an unsigned value as signed, failing if the top bit is set
pub fn u256_to_i256(value: U256, operation: &str) -> StrataResult<I256> {
    if value.leading_zeros() == 0 {
        return Err(StrataError::overflow(operation, &[&value]));
    }
    let (hi, lo) = value.into_words();
    Ok(I256::from_words(hi as i128, lo as i128))
}

/// Reinterpret a signed value as unsigned, failing if negative
pub fn i256_to_u256(value: I256, operation: &str) -> StrataResult<U256> {
    if value < I256::ZERO {
        return Err(StrataError::underflow(operation, &[&value]));
    }
    let (hi, lo) = value.into_words();
    Ok(U256::from_words(hi as u128, lo as u128))
}
