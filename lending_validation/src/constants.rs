use alloy::primitives::U256;

pub const WAD_DECIMALS: u8 = 18;
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

pub const RAY_DECIMALS: u8 = 27;
pub const RAY: U256 = U256::from_limbs([11_515_845_246_265_065_472, 54_210_108, 0, 0]);
pub const WAD_RAY_RATIO: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);

/// 100.00% in basis points
pub const PERCENTAGE_FACTOR: U256 = U256::from_limbs([10_000, 0, 0, 0]);
pub const HALF_PERCENT: U256 = U256::from_limbs([5_000, 0, 0, 0]);
pub const MAX_PERCENTAGE_BPS: u16 = 10_000;

/// Health factor (WAD) below which a position can be liquidated
pub const HEALTH_FACTOR_LIQUIDATION_THRESHOLD: U256 = WAD;
pub const HEALTH_FACTOR_DECIMALS: u8 = WAD_DECIMALS;

/// Values in the reference currency are WAD scaled
pub const REFERENCE_VALUE_DECIMALS: u8 = WAD_DECIMALS;

/// 25% of the available liquidity
pub const DEFAULT_MAX_STABLE_LOAN_PERCENT: u16 = 2_500;

/// Two bits per reserve in a 256 bit user configuration
pub const MAX_RESERVES: u8 = 128;
