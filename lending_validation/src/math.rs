//! Checked fixed-point helpers.
//!
//! WAD and RAY operations floor the result. Percentage operations round half
//! up, matching the ledger that applies the validated actions.

use alloy::primitives::U256;

use crate::{
    constants::{HALF_PERCENT, PERCENTAGE_FACTOR, RAY, WAD, WAD_RAY_RATIO},
    errors::MathError,
};

fn checked_mul(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

fn checked_div(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_div(b).ok_or(MathError::DivisionByZero)
}

/// `a * b / WAD`, floored
pub fn wad_mul(a: U256, b: U256) -> Result<U256, MathError> {
    checked_div(checked_mul(a, b)?, WAD)
}

/// `a * WAD / b`, floored
pub fn wad_div(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    checked_div(checked_mul(a, WAD)?, b)
}

/// `a * b / RAY`, floored
pub fn ray_mul(a: U256, b: U256) -> Result<U256, MathError> {
    checked_div(checked_mul(a, b)?, RAY)
}

/// `a * RAY / b`, floored
pub fn ray_div(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    checked_div(checked_mul(a, RAY)?, b)
}

pub fn ray_to_wad(a: U256) -> U256 {
    a / WAD_RAY_RATIO
}

pub fn wad_to_ray(a: U256) -> Result<U256, MathError> {
    checked_mul(a, WAD_RAY_RATIO)
}

/// Applies a basis-point percentage to `value`, rounding half up.
pub fn percent_mul(value: U256, percentage: U256) -> Result<U256, MathError> {
    if value.is_zero() || percentage.is_zero() {
        return Ok(U256::ZERO);
    }
    let product = checked_mul(value, percentage)?;
    let rounded = product.checked_add(HALF_PERCENT).ok_or(MathError::Overflow)?;
    checked_div(rounded, PERCENTAGE_FACTOR)
}

/// Divides `value` by a basis-point percentage, rounding half up.
pub fn percent_div(value: U256, percentage: U256) -> Result<U256, MathError> {
    if percentage.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let half_percentage = percentage / U256::from(2);
    let scaled = checked_mul(value, PERCENTAGE_FACTOR)?;
    let rounded = scaled
        .checked_add(half_percentage)
        .ok_or(MathError::Overflow)?;
    checked_div(rounded, percentage)
}

/// `10^decimals` as a U256
pub fn unit(decimals: u8) -> Result<U256, MathError> {
    U256::from(10)
        .checked_pow(U256::from(decimals))
        .ok_or(MathError::Overflow)
}
