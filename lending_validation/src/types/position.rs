use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::constants::HEALTH_FACTOR_LIQUIDATION_THRESHOLD;

/// Aggregate cross-reserve position of a user.
///
/// Values are in the reference currency (WAD), averages in basis points and
/// the health factor in WAD, `U256::MAX` when there is no debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPosition {
    pub collateral_value: U256,
    pub debt_value: U256,
    pub avg_ltv: U256,
    pub avg_liquidation_threshold: U256,
    pub health_factor: U256,
}

impl AccountPosition {
    pub fn empty() -> Self {
        Self {
            collateral_value: U256::ZERO,
            debt_value: U256::ZERO,
            avg_ltv: U256::ZERO,
            avg_liquidation_threshold: U256::ZERO,
            health_factor: U256::MAX,
        }
    }

    pub fn has_debt(&self) -> bool {
        !self.debt_value.is_zero()
    }

    pub fn is_healthy(&self) -> bool {
        self.health_factor >= HEALTH_FACTOR_LIQUIDATION_THRESHOLD
    }
}

impl Default for AccountPosition {
    fn default() -> Self {
        Self::empty()
    }
}
