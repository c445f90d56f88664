use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{constants::MAX_PERCENTAGE_BPS, errors::ConfigurationError};

const LTV_MASK: u64 = 0xFFFF;
const LIQUIDATION_THRESHOLD_SHIFT: u64 = 16;
const LIQUIDATION_BONUS_SHIFT: u64 = 32;
const DECIMALS_SHIFT: u64 = 48;
const ACTIVE_BIT: u64 = 56;
const FROZEN_BIT: u64 = 57;
const BORROWING_ENABLED_BIT: u64 = 58;
const STABLE_BORROWING_ENABLED_BIT: u64 = 59;
// reserve factor lives in the second limb (bits 64-79)
const RESERVE_FACTOR_MASK: u64 = 0xFFFF;

/// Status flags of a reserve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFlags {
    pub active: bool,
    pub frozen: bool,
    pub borrowing_enabled: bool,
    pub stable_rate_borrowing_enabled: bool,
}

/// Risk parameters and flags of a reserve.
///
/// Percentages are basis points (10000 = 100%). Construct through
/// [`ReserveConfiguration::new`] or [`ReserveConfiguration::from_bitmap`] so the
/// `ltv <= liquidation_threshold <= 100%` invariant holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReserveConfiguration {
    pub ltv: u16,
    pub liquidation_threshold: u16,
    pub liquidation_bonus: u16,
    pub decimals: u8,
    pub reserve_factor: u16,
    pub flags: ReserveFlags,
}

impl ReserveConfiguration {
    pub fn new(
        ltv: u16,
        liquidation_threshold: u16,
        liquidation_bonus: u16,
        decimals: u8,
        reserve_factor: u16,
        flags: ReserveFlags,
    ) -> Result<Self, ConfigurationError> {
        if ltv > liquidation_threshold || liquidation_threshold > MAX_PERCENTAGE_BPS {
            return Err(ConfigurationError::InvalidRiskParameters {
                ltv,
                liquidation_threshold,
            });
        }
        if reserve_factor > MAX_PERCENTAGE_BPS {
            return Err(ConfigurationError::PercentageOutOfRange {
                field: "reserve factor",
                value: reserve_factor,
            });
        }

        Ok(Self {
            ltv,
            liquidation_threshold,
            liquidation_bonus,
            decimals,
            reserve_factor,
            flags,
        })
    }

    /// Decodes the packed on-chain configuration word
    ///
    /// Layout: bits 0-15 LTV, 16-31 liquidation threshold, 32-47 liquidation
    /// bonus, 48-55 decimals, 56 active, 57 frozen, 58 borrowing enabled,
    /// 59 stable rate borrowing enabled, 64-79 reserve factor.
    pub fn from_bitmap(bitmap: U256) -> Result<Self, ConfigurationError> {
        let limbs = bitmap.as_limbs();
        let low = limbs[0];
        let high = limbs[1];

        let bit = |index: u64| (low >> index) & 1 == 1;

        Self::new(
            (low & LTV_MASK) as u16,
            ((low >> LIQUIDATION_THRESHOLD_SHIFT) & LTV_MASK) as u16,
            ((low >> LIQUIDATION_BONUS_SHIFT) & LTV_MASK) as u16,
            ((low >> DECIMALS_SHIFT) & 0xFF) as u8,
            (high & RESERVE_FACTOR_MASK) as u16,
            ReserveFlags {
                active: bit(ACTIVE_BIT),
                frozen: bit(FROZEN_BIT),
                borrowing_enabled: bit(BORROWING_ENABLED_BIT),
                stable_rate_borrowing_enabled: bit(STABLE_BORROWING_ENABLED_BIT),
            },
        )
    }

    /// Encodes back into the packed on-chain configuration word
    pub fn to_bitmap(&self) -> U256 {
        let flag = |enabled: bool, index: u64| if enabled { 1u64 << index } else { 0 };

        let low = u64::from(self.ltv)
            | u64::from(self.liquidation_threshold) << LIQUIDATION_THRESHOLD_SHIFT
            | u64::from(self.liquidation_bonus) << LIQUIDATION_BONUS_SHIFT
            | u64::from(self.decimals) << DECIMALS_SHIFT
            | flag(self.flags.active, ACTIVE_BIT)
            | flag(self.flags.frozen, FROZEN_BIT)
            | flag(self.flags.borrowing_enabled, BORROWING_ENABLED_BIT)
            | flag(
                self.flags.stable_rate_borrowing_enabled,
                STABLE_BORROWING_ENABLED_BIT,
            );
        let high = u64::from(self.reserve_factor);

        U256::from_limbs([low, high, 0, 0])
    }
}

#[derive(Deserialize)]
struct RawReserveConfiguration {
    ltv: u16,
    liquidation_threshold: u16,
    #[serde(default)]
    liquidation_bonus: u16,
    decimals: u8,
    #[serde(default)]
    reserve_factor: u16,
    flags: ReserveFlags,
}

impl<'de> Deserialize<'de> for ReserveConfiguration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawReserveConfiguration::deserialize(deserializer)?;
        Self::new(
            raw.ltv,
            raw.liquidation_threshold,
            raw.liquidation_bonus,
            raw.decimals,
            raw.reserve_factor,
            raw.flags,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// A listed asset and the tokens tracking positions in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    pub underlying_asset: Address,
    /// Interest bearing receipt, redeemable 1:1 for the underlying
    pub claim_token_address: Address,
    pub stable_debt_token_address: Address,
    pub variable_debt_token_address: Address,
    /// Position of the reserve in the user configuration bitmap
    pub index: u8,
    pub configuration: ReserveConfiguration,
}

impl Reserve {
    pub fn flags(&self) -> ReserveFlags {
        self.configuration.flags
    }

    pub fn ltv(&self) -> U256 {
        U256::from(self.configuration.ltv)
    }

    pub fn liquidation_threshold(&self) -> U256 {
        U256::from(self.configuration.liquidation_threshold)
    }
}
