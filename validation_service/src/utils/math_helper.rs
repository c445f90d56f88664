use alloy::primitives::U256;

/// Converts a fixed-point `value` with `precision` decimals to `f64` for display.
/// Values that do not fit saturate to `f64::MAX`.
pub fn divide_by_precision_f64(value: U256, precision: u8) -> f64 {
    let unit = U256::from(10).pow(U256::from(precision));

    let (quotient, remainder) = match (value.checked_div(unit), value.checked_rem(unit)) {
        (Some(q), Some(r)) => (q, r),
        _ => return f64::MAX,
    };

    let (quotient, remainder, unit) = match (
        u128::try_from(quotient),
        u128::try_from(remainder),
        u128::try_from(unit),
    ) {
        (Ok(q), Ok(r), Ok(u)) => (q, r, u),
        _ => return f64::MAX,
    };

    quotient as f64 + (remainder as f64) / (unit as f64)
}

/// Basis points as a percentage, 8500 => 85.0
pub fn bps_to_percent(value: U256) -> f64 {
    divide_by_precision_f64(value, 2)
}
