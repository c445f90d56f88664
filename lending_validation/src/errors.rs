use alloy::primitives::Address;
use thiserror::Error;

/// Failures of the checked fixed-point helpers in [`crate::math`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("fixed-point arithmetic overflowed")]
    Overflow,
    #[error("division by zero")]
    DivisionByZero,
}

/// Rejected reserve or user configuration input at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error(
        "invalid risk parameters: ltv {ltv} and liquidation threshold {liquidation_threshold} must satisfy ltv <= threshold <= 10000"
    )]
    InvalidRiskParameters {
        ltv: u16,
        liquidation_threshold: u16,
    },
    #[error("{field} of {value} exceeds 100%")]
    PercentageOutOfRange { field: &'static str, value: u16 },
    #[error("reserve index {0} does not fit in the user configuration bitmap")]
    InvalidReserveIndex(u8),
}

/// Reason a user action was refused.
///
/// Every check is terminal: the first violated precondition is reported and
/// the caller is expected to abort the whole action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than zero.")]
    ZeroAmount,
    #[error("Action requires an active reserve.")]
    ReserveInactive,
    #[error("Action cannot be performed because the reserve is frozen.")]
    ReserveFrozen,
    #[error("There is not enough liquidity available in the reserve.")]
    InsufficientLiquidity,
    #[error("User cannot withdraw more than the available balance.")]
    InsufficientUserBalance,
    #[error("Decreasing this collateral would drop the health factor below the liquidation threshold.")]
    CollateralDecreaseUnsafe,
    #[error("Borrowing is not enabled on this reserve.")]
    BorrowingDisabled,
    #[error("Invalid interest rate mode selected.")]
    InvalidRateMode,
    #[error("The collateral balance is 0.")]
    NoCollateral,
    #[error("Health factor is lesser than the liquidation threshold.")]
    HealthFactorTooLow,
    #[error("There is not enough collateral to cover a new borrow.")]
    InsufficientCollateralForBorrow,
    #[error("Stable borrowing is not enabled on this reserve.")]
    StableBorrowingDisabled,
    #[error("Collateral is the same currency that is being borrowed at a stable rate.")]
    StableBorrowSelfCollateralAbuse,
    #[error("The requested amount is greater than the max stable loan size.")]
    StableLoanSizeExceeded,
    #[error("For repayment of the selected rate mode, the user needs outstanding debt of that type.")]
    NoOutstandingDebtForRateMode,
    #[error("To repay on behalf of another user an explicit amount is required.")]
    RepayAllRequiresSelf,
    #[error("User does not have a stable rate loan in progress on this reserve.")]
    NoStableDebt,
    #[error("User does not have a variable rate loan in progress on this reserve.")]
    NoVariableDebt,
    #[error("The underlying balance needs to be greater than 0.")]
    NoCollateralBalance,
    #[error("Transfer cannot be allowed.")]
    TransferNotAllowed,
    #[error("Inconsistent flashloan parameters.")]
    InconsistentFlashloanParams,
    #[error("Reserve {0} is not listed.")]
    UnknownReserve(Address),
    #[error("No price available for asset {0}.")]
    MissingPrice(Address),
    #[error(transparent)]
    Math(#[from] MathError),
}

impl ValidationError {
    /// Stable name of the failure kind, surfaced verbatim to off-chain callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZeroAmount",
            Self::ReserveInactive => "ReserveInactive",
            Self::ReserveFrozen => "ReserveFrozen",
            Self::InsufficientLiquidity => "InsufficientLiquidity",
            Self::InsufficientUserBalance => "InsufficientUserBalance",
            Self::CollateralDecreaseUnsafe => "CollateralDecreaseUnsafe",
            Self::BorrowingDisabled => "BorrowingDisabled",
            Self::InvalidRateMode => "InvalidRateMode",
            Self::NoCollateral => "NoCollateral",
            Self::HealthFactorTooLow => "HealthFactorTooLow",
            Self::InsufficientCollateralForBorrow => "InsufficientCollateralForBorrow",
            Self::StableBorrowingDisabled => "StableBorrowingDisabled",
            Self::StableBorrowSelfCollateralAbuse => "StableBorrowSelfCollateralAbuse",
            Self::StableLoanSizeExceeded => "StableLoanSizeExceeded",
            Self::NoOutstandingDebtForRateMode => "NoOutstandingDebtForRateMode",
            Self::RepayAllRequiresSelf => "RepayAllRequiresSelf",
            Self::NoStableDebt => "NoStableDebt",
            Self::NoVariableDebt => "NoVariableDebt",
            Self::NoCollateralBalance => "NoCollateralBalance",
            Self::TransferNotAllowed => "TransferNotAllowed",
            Self::InconsistentFlashloanParams => "InconsistentFlashloanParams",
            Self::UnknownReserve(_) => "UnknownReserve",
            Self::MissingPrice(_) => "MissingPrice",
            Self::Math(MathError::Overflow) => "MathOverflow",
            Self::Math(MathError::DivisionByZero) => "DivisionByZero",
        }
    }
}
