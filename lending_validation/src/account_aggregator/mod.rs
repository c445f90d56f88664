use alloy::primitives::{Address, U256};
use tracing::{debug, instrument};

use crate::{
    constants::HEALTH_FACTOR_LIQUIDATION_THRESHOLD,
    errors::{MathError, ValidationError},
    interfaces::{MarketView, UserConfigStore},
    math,
    types::AccountPosition,
};

/// Computes user account positions across all reserves.
///
/// Stateless: every call reads the collaborators afresh, so balances and
/// prices are never cached between calls.
pub struct AccountAggregator;

/// Collateral balance to subtract from one reserve while scanning
#[derive(Debug, Clone, Copy)]
struct CollateralDecrease<'a> {
    asset: &'a Address,
    amount: U256,
}

/// Running sums of a scan, before the averages are normalized
#[derive(Debug, Default)]
struct PositionTotals {
    collateral_value: U256,
    debt_value: U256,
    weighted_ltv: U256,
    weighted_liquidation_threshold: U256,
}

impl PositionTotals {
    fn add_collateral(
        &mut self,
        value: U256,
        ltv: U256,
        liquidation_threshold: U256,
    ) -> Result<(), MathError> {
        self.collateral_value = checked_add(self.collateral_value, value)?;
        self.weighted_ltv = checked_add(
            self.weighted_ltv,
            value.checked_mul(ltv).ok_or(MathError::Overflow)?,
        )?;
        self.weighted_liquidation_threshold = checked_add(
            self.weighted_liquidation_threshold,
            value
                .checked_mul(liquidation_threshold)
                .ok_or(MathError::Overflow)?,
        )?;
        Ok(())
    }

    fn add_debt(&mut self, value: U256) -> Result<(), MathError> {
        self.debt_value = checked_add(self.debt_value, value)?;
        Ok(())
    }

    fn into_position(self) -> Result<AccountPosition, MathError> {
        let (avg_ltv, avg_liquidation_threshold) = if self.collateral_value.is_zero() {
            (U256::ZERO, U256::ZERO)
        } else {
            (
                self.weighted_ltv / self.collateral_value,
                self.weighted_liquidation_threshold / self.collateral_value,
            )
        };

        let health_factor = AccountAggregator::calculate_health_factor(
            self.collateral_value,
            self.debt_value,
            avg_liquidation_threshold,
        )?;

        Ok(AccountPosition {
            collateral_value: self.collateral_value,
            debt_value: self.debt_value,
            avg_ltv,
            avg_liquidation_threshold,
            health_factor,
        })
    }
}

fn checked_add(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

impl AccountAggregator {
    /// Computes the user's position over every reserve flagged in `user_config`,
    /// in reserve-list order.
    ///
    /// # Arguments
    /// * `user` - Address of the account
    /// * `market` - Reserve, price and balance collaborators
    /// * `user_config` - Collateral/borrowing bits of the account
    ///
    /// # Returns
    /// * `Result<AccountPosition, ValidationError>` - Collateral and debt values
    ///   in the reference currency, weighted averages and the health factor
    pub fn compute_account_data(
        user: &Address,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<AccountPosition, ValidationError> {
        let position = Self::scan_positions(user, market, user_config, None)?;
        debug!(
            "Account {} position: collateral {} debt {} ltv {} threshold {} hf {}",
            user,
            position.collateral_value,
            position.debt_value,
            position.avg_ltv,
            position.avg_liquidation_threshold,
            position.health_factor
        );
        Ok(position)
    }

    /// Checks whether `amount` of `asset` collateral can leave the account
    /// without dropping the health factor below the liquidation threshold.
    ///
    /// The what-if position is produced by the same scan as
    /// [`AccountAggregator::compute_account_data`] with the reserve's collateral
    /// balance reduced, so both computations round identically.
    ///
    /// Only a zero liquidation threshold skips the check: a reserve with LTV 0
    /// and a nonzero threshold still backs the health factor and is checked.
    ///
    /// # Returns
    /// * `Ok(true)` - The decrease keeps the account healthy or carries no risk
    /// * `Ok(false)` - The decrease would make the account liquidatable
    /// * `Err(InsufficientUserBalance)` - `amount` exceeds the collateral balance
    #[instrument("BALANCE_DECREASE_ALLOWED", skip(market, user_config))]
    pub fn balance_decrease_allowed(
        asset: &Address,
        user: &Address,
        amount: U256,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
    ) -> Result<bool, ValidationError> {
        let reserve = market.reserve(asset)?;

        if !user_config.is_borrowing_any() || !user_config.is_using_as_collateral(reserve.index)
        {
            return Ok(true);
        }

        // A reserve without liquidation threshold adds nothing to the health factor
        if reserve.configuration.liquidation_threshold == 0 {
            return Ok(true);
        }

        let decrease = CollateralDecrease { asset, amount };
        let position = Self::scan_positions(user, market, user_config, Some(decrease))?;

        let allowed = position.is_healthy();
        debug!(
            "Decrease of {} leaves health factor at {} (allowed: {})",
            amount, position.health_factor, allowed
        );
        Ok(allowed)
    }

    /// Reference currency value of `amount` base units of an asset
    pub fn asset_value(price: U256, amount: U256, decimals: u8) -> Result<U256, MathError> {
        let product = price.checked_mul(amount).ok_or(MathError::Overflow)?;
        Ok(product / math::unit(decimals)?)
    }

    /// `collateral * threshold / debt` in WAD, `U256::MAX` without debt
    pub fn calculate_health_factor(
        collateral_value: U256,
        debt_value: U256,
        avg_liquidation_threshold: U256,
    ) -> Result<U256, MathError> {
        if debt_value.is_zero() {
            return Ok(U256::MAX);
        }
        math::wad_div(
            math::percent_mul(collateral_value, avg_liquidation_threshold)?,
            debt_value,
        )
    }

    /// Remaining borrowing power in the reference currency, zero when the
    /// debt already exceeds what the LTV allows
    pub fn available_borrows(position: &AccountPosition) -> Result<U256, MathError> {
        let max_borrow = math::percent_mul(position.collateral_value, position.avg_ltv)?;
        Ok(max_borrow.saturating_sub(position.debt_value))
    }

    /// Whether liquidation logic may act on the position
    pub fn is_liquidatable(position: &AccountPosition) -> bool {
        position.health_factor < HEALTH_FACTOR_LIQUIDATION_THRESHOLD
    }

    fn scan_positions(
        user: &Address,
        market: &MarketView<'_>,
        user_config: &dyn UserConfigStore,
        decrease: Option<CollateralDecrease<'_>>,
    ) -> Result<AccountPosition, ValidationError> {
        if user_config.is_empty() {
            return Ok(AccountPosition::empty());
        }

        let mut totals = PositionTotals::default();

        for asset in market.reserves.reserves_list() {
            let reserve = market.reserve(asset)?;
            let using_as_collateral = user_config.is_using_as_collateral(reserve.index);
            let borrowing = user_config.is_borrowing(reserve.index);

            if !using_as_collateral && !borrowing {
                continue;
            }

            let price = market.asset_price(asset)?;
            let decimals = reserve.configuration.decimals;

            if using_as_collateral && reserve.configuration.liquidation_threshold != 0 {
                let mut balance = market.claim_balance(reserve, user);
                if let Some(decrease) = decrease.filter(|decrease| decrease.asset == asset) {
                    balance = balance
                        .checked_sub(decrease.amount)
                        .ok_or(ValidationError::InsufficientUserBalance)?;
                }

                let value = Self::asset_value(price, balance, decimals)?;
                totals.add_collateral(value, reserve.ltv(), reserve.liquidation_threshold())?;
            }

            if borrowing {
                let (stable_debt, variable_debt) = market.debt_balances(reserve, user);
                let debt = checked_add(stable_debt, variable_debt)?;
                totals.add_debt(Self::asset_value(price, debt, decimals)?)?;
            }
        }

        Ok(totals.into_position()?)
    }
}
