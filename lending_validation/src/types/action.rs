use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Interest accrual scheme of a debt position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestRateMode {
    None,
    Stable,
    Variable,
}

impl TryFrom<u8> for InterestRateMode {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Stable),
            2 => Ok(Self::Variable),
            _ => Err(ValidationError::InvalidRateMode),
        }
    }
}

/// Amount requested for a repayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepayAmount {
    Exact(U256),
    /// Whatever the outstanding debt is at execution time
    All,
}
