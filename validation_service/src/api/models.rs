use alloy::primitives::{Address, U256};
use lending_validation::{
    constants::{HEALTH_FACTOR_DECIMALS, REFERENCE_VALUE_DECIMALS},
    types::AccountPosition,
    ValidationError,
};
use serde::{Deserialize, Serialize};

use crate::utils::math_helper::{bps_to_percent, divide_by_precision_f64};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&ValidationError> for ErrorBody {
    fn from(error: &ValidationError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl From<Result<(), ValidationError>> for ValidationResponse {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(error) => Self {
                valid: false,
                error: Some(ErrorBody::from(&error)),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub block_number: u64,
    pub snapshot_age_seconds: i64,
}

/// Human readable rendition of a position; percentages in %, health factor
/// capped for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDisplay {
    pub collateral_value: f64,
    pub debt_value: f64,
    pub available_borrows: f64,
    pub avg_ltv: f64,
    pub avg_liquidation_threshold: f64,
    pub health_factor: f64,
}

impl PositionDisplay {
    pub fn new(position: &AccountPosition, available_borrows: U256, max_health_factor: u64) -> Self {
        let health_factor =
            divide_by_precision_f64(position.health_factor, HEALTH_FACTOR_DECIMALS)
                .min(max_health_factor as f64);

        Self {
            collateral_value: divide_by_precision_f64(
                position.collateral_value,
                REFERENCE_VALUE_DECIMALS,
            ),
            debt_value: divide_by_precision_f64(position.debt_value, REFERENCE_VALUE_DECIMALS),
            available_borrows: divide_by_precision_f64(
                available_borrows,
                REFERENCE_VALUE_DECIMALS,
            ),
            avg_ltv: bps_to_percent(position.avg_ltv),
            avg_liquidation_threshold: bps_to_percent(position.avg_liquidation_threshold),
            health_factor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user: Address,
    pub block_number: u64,
    pub position: AccountPosition,
    pub available_borrows: U256,
    pub liquidatable: bool,
    pub display: PositionDisplay,
}
