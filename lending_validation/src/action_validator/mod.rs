use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    account_aggregator::AccountAggregator,
    constants::{
        DEFAULT_MAX_STABLE_LOAN_PERCENT, HEALTH_FACTOR_LIQUIDATION_THRESHOLD, PERCENTAGE_FACTOR,
    },
    errors::{MathError, ValidationError},
    interfaces::{MarketView, UserConfigStore},
    math,
    types::{InterestRateMode, RepayAmount, Reserve},
};

/// Protocol-wide limits applied by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Share of the available liquidity a single stable rate loan may take, in bps
    pub max_stable_loan_percent: u16,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_stable_loan_percent: DEFAULT_MAX_STABLE_LOAN_PERCENT,
        }
    }
}

/// Guard sequences for every user-facing action.
///
/// Each check is terminal: the first violated precondition is returned and
/// nothing is mutated.
pub struct ActionValidator;

impl ActionValidator {
    /// Validates a deposit of `amount` into the `asset` reserve
    pub fn validate_deposit(
        asset: &Address,
        amount: U256,
        market: &MarketView<'_>,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        Self::require_active(reserve)?;
        Self::require_not_frozen(reserve)?;
        Self::require_non_zero(amount)?;
        Ok(())
    }

    /// Validates a withdrawal of `amount` underlying from the `asset` reserve
    ///
    /// # Errors
    /// * `InsufficientLiquidity` - The pool holds less than `amount`
    /// * `InsufficientUserBalance` - `amount` exceeds the user's claim balance
    /// * `CollateralDecreaseUnsafe` - The withdrawal would make the account liquidatable
    #[instrument("VALIDATE_WITHDRAW", skip(market, user_config))]
    pub fn validate_withdraw(
        asset: &Address,
        user: &Address,
        amount: U256,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        Self::require_active(reserve)?;
        Self::require_non_zero(amount)?;

        if market.available_liquidity(reserve) < amount {
            return Err(ValidationError::InsufficientLiquidity);
        }

        if amount > market.claim_balance(reserve, user) {
            return Err(ValidationError::InsufficientUserBalance);
        }

        if !AccountAggregator::balance_decrease_allowed(asset, user, amount, market, user_config)? {
            return Err(ValidationError::CollateralDecreaseUnsafe);
        }

        Ok(())
    }

    /// Validates a borrow of `amount` from the `asset` reserve at `rate_mode`
    ///
    /// The stable rate checks key off the requested `rate_mode`.
    ///
    /// # Arguments
    /// * `asset` - Reserve to borrow from
    /// * `user` - Account that receives the debt
    /// * `amount` - Amount of underlying, in base units
    /// * `rate_mode` - Requested interest rate mode
    /// * `market` - Reserve, price and balance collaborators
    /// * `user_config` - Collateral/borrowing bits of `user`
    /// * `config` - Protocol-wide limits
    #[instrument("VALIDATE_BORROW", skip(market, user_config, config))]
    pub fn validate_borrow(
        asset: &Address,
        user: &Address,
        amount: U256,
        rate_mode: InterestRateMode,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
        config: &ValidatorConfig,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        let flags = reserve.flags();

        Self::require_active(reserve)?;
        Self::require_not_frozen(reserve)?;
        Self::require_non_zero(amount)?;

        if !flags.borrowing_enabled {
            return Err(ValidationError::BorrowingDisabled);
        }

        if !matches!(
            rate_mode,
            InterestRateMode::Stable | InterestRateMode::Variable
        ) {
            return Err(ValidationError::InvalidRateMode);
        }

        let available_liquidity = market.available_liquidity(reserve);
        if available_liquidity < amount {
            return Err(ValidationError::InsufficientLiquidity);
        }

        let position = AccountAggregator::compute_account_data(user, market, user_config)?;

        if position.collateral_value.is_zero() {
            return Err(ValidationError::NoCollateral);
        }

        if position.health_factor <= HEALTH_FACTOR_LIQUIDATION_THRESHOLD {
            return Err(ValidationError::HealthFactorTooLow);
        }

        let amount_value = AccountAggregator::asset_value(
            market.asset_price(asset)?,
            amount,
            reserve.configuration.decimals,
        )?;

        // Collateral with a zero average LTV cannot back any debt
        if position.avg_ltv.is_zero() {
            return Err(ValidationError::InsufficientCollateralForBorrow);
        }

        let total_debt_value = position
            .debt_value
            .checked_add(amount_value)
            .ok_or(MathError::Overflow)?;

        // (debt + amount) / ltv <= collateral, cross-multiplied so no rounding
        // can let a borrow through
        let required = total_debt_value
            .checked_mul(PERCENTAGE_FACTOR)
            .ok_or(MathError::Overflow)?;
        let borrowing_power = position
            .collateral_value
            .checked_mul(position.avg_ltv)
            .ok_or(MathError::Overflow)?;

        debug!(
            "Borrow needs {} weighted collateral, account has {}",
            required, borrowing_power
        );

        if required > borrowing_power {
            return Err(ValidationError::InsufficientCollateralForBorrow);
        }

        if rate_mode == InterestRateMode::Stable {
            if !flags.stable_rate_borrowing_enabled {
                return Err(ValidationError::StableBorrowingDisabled);
            }

            let claim_balance = market.claim_balance(reserve, user);
            if !Self::stable_borrow_allowed(reserve, user_config, amount, claim_balance) {
                return Err(ValidationError::StableBorrowSelfCollateralAbuse);
            }

            let max_stable_loan = math::percent_mul(
                available_liquidity,
                U256::from(config.max_stable_loan_percent),
            )?;
            if amount > max_stable_loan {
                return Err(ValidationError::StableLoanSizeExceeded);
            }
        }

        Ok(())
    }

    /// Validates a repayment by `caller` of `on_behalf_of`'s debt
    pub fn validate_repay(
        asset: &Address,
        amount: RepayAmount,
        rate_mode: InterestRateMode,
        caller: &Address,
        on_behalf_of: &Address,
        market: &MarketView<'_>,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        Self::require_active(reserve)?;

        match amount {
            RepayAmount::Exact(amount) => Self::require_non_zero(amount)?,
            RepayAmount::All if caller != on_behalf_of => {
                return Err(ValidationError::RepayAllRequiresSelf)
            }
            RepayAmount::All => {}
        }

        let (stable_debt, variable_debt) = market.debt_balances(reserve, on_behalf_of);
        let has_debt_of_mode = match rate_mode {
            InterestRateMode::Stable => !stable_debt.is_zero(),
            InterestRateMode::Variable => !variable_debt.is_zero(),
            InterestRateMode::None => false,
        };

        if !has_debt_of_mode {
            return Err(ValidationError::NoOutstandingDebtForRateMode);
        }

        Ok(())
    }

    /// Validates swapping `user`'s debt in `asset` away from `current_rate_mode`
    pub fn validate_swap_rate_mode(
        asset: &Address,
        user: &Address,
        current_rate_mode: InterestRateMode,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        Self::require_active(reserve)?;
        Self::require_not_frozen(reserve)?;

        let (stable_debt, variable_debt) = market.debt_balances(reserve, user);

        match current_rate_mode {
            InterestRateMode::Stable => {
                if stable_debt.is_zero() {
                    return Err(ValidationError::NoStableDebt);
                }
            }
            InterestRateMode::Variable => {
                if variable_debt.is_zero() {
                    return Err(ValidationError::NoVariableDebt);
                }

                if !reserve.flags().stable_rate_borrowing_enabled {
                    return Err(ValidationError::StableBorrowingDisabled);
                }

                let total_debt = stable_debt
                    .checked_add(variable_debt)
                    .ok_or(MathError::Overflow)?;
                let claim_balance = market.claim_balance(reserve, user);
                if !Self::stable_borrow_allowed(reserve, user_config, total_debt, claim_balance) {
                    return Err(ValidationError::StableBorrowSelfCollateralAbuse);
                }
            }
            InterestRateMode::None => return Err(ValidationError::InvalidRateMode),
        }

        Ok(())
    }

    /// Validates toggling the `asset` reserve as collateral for `user`
    #[instrument("VALIDATE_SET_USE_AS_COLLATERAL", skip(market, user_config))]
    pub fn validate_set_use_reserve_as_collateral(
        asset: &Address,
        user: &Address,
        use_as_collateral: bool,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<(), ValidationError> {
        let reserve = market.reserve(asset)?;
        Self::require_active(reserve)?;

        let claim_balance = market.claim_balance(reserve, user);
        if claim_balance.is_zero() {
            return Err(ValidationError::NoCollateralBalance);
        }

        if !use_as_collateral
            && !AccountAggregator::balance_decrease_allowed(
                asset,
                user,
                claim_balance,
                market,
                user_config,
            )?
        {
            return Err(ValidationError::CollateralDecreaseUnsafe);
        }

        Ok(())
    }

    /// Validates a claim token transfer once it has been applied to the
    /// sender's balances: the sender must remain healthy
    pub fn validate_transfer(
        from: &Address,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<(), ValidationError> {
        let position = AccountAggregator::compute_account_data(from, market, user_config)?;

        if position.health_factor < HEALTH_FACTOR_LIQUIDATION_THRESHOLD {
            return Err(ValidationError::TransferNotAllowed);
        }

        Ok(())
    }

    /// Validates that every flashloan asset has a matching amount
    pub fn validate_flashloan(assets: &[Address], amounts: &[U256]) -> Result<(), ValidationError> {
        if assets.is_empty() || assets.len() != amounts.len() {
            return Err(ValidationError::InconsistentFlashloanParams);
        }
        Ok(())
    }

    /// Stable debt backed by a collateral deposit of the same asset must
    /// exceed that deposit
    fn stable_borrow_allowed(
        reserve: &Reserve,
        user_config: &dyn UserConfigStore,
        amount: U256,
        claim_balance: U256,
    ) -> bool {
        !user_config.is_using_as_collateral(reserve.index)
            || reserve.configuration.ltv == 0
            || amount > claim_balance
    }

    fn require_active(reserve: &Reserve) -> Result<(), ValidationError> {
        if !reserve.flags().active {
            return Err(ValidationError::ReserveInactive);
        }
        Ok(())
    }

    fn require_not_frozen(reserve: &Reserve) -> Result<(), ValidationError> {
        if reserve.flags().frozen {
            return Err(ValidationError::ReserveFrozen);
        }
        Ok(())
    }

    fn require_non_zero(amount: U256) -> Result<(), ValidationError> {
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
