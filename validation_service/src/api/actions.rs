use alloy::primitives::{Address, U256};
use lending_validation::{
    interfaces::{MarketView, TokenBalance},
    types::{InterestRateMode, RepayAmount},
    ActionValidator, ValidationError, ValidatorConfig,
};
use serde::{Deserialize, Serialize};

use crate::snapshot::MarketSnapshot;

/// A user action to check against the current snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRequest {
    Deposit {
        asset: Address,
        amount: U256,
    },
    Withdraw {
        asset: Address,
        user: Address,
        amount: U256,
    },
    Borrow {
        asset: Address,
        user: Address,
        amount: U256,
        rate_mode: InterestRateMode,
    },
    Repay {
        asset: Address,
        amount: RepayAmount,
        rate_mode: InterestRateMode,
        caller: Address,
        on_behalf_of: Address,
    },
    SwapRateMode {
        asset: Address,
        user: Address,
        current_rate_mode: InterestRateMode,
    },
    SetUseReserveAsCollateral {
        asset: Address,
        user: Address,
        use_as_collateral: bool,
    },
    /// Transfer of `amount` claim tokens of the `asset` reserve away from `from`
    Transfer {
        asset: Address,
        from: Address,
        amount: U256,
    },
    Flashloan {
        assets: Vec<Address>,
        amounts: Vec<U256>,
    },
}

impl ActionRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Borrow { .. } => "borrow",
            Self::Repay { .. } => "repay",
            Self::SwapRateMode { .. } => "swap_rate_mode",
            Self::SetUseReserveAsCollateral { .. } => "set_use_reserve_as_collateral",
            Self::Transfer { .. } => "transfer",
            Self::Flashloan { .. } => "flashloan",
        }
    }

    /// Runs the matching validator against `snapshot`
    pub fn validate(
        &self,
        snapshot: &MarketSnapshot,
        config: &ValidatorConfig,
    ) -> Result<(), ValidationError> {
        let market = snapshot.view();

        match self {
            Self::Deposit { asset, amount } => {
                ActionValidator::validate_deposit(asset, *amount, &market)
            }
            Self::Withdraw {
                asset,
                user,
                amount,
            } => ActionValidator::validate_withdraw(
                asset,
                user,
                *amount,
                &market,
                &snapshot.user_configuration(user),
            ),
            Self::Borrow {
                asset,
                user,
                amount,
                rate_mode,
            } => ActionValidator::validate_borrow(
                asset,
                user,
                *amount,
                *rate_mode,
                &market,
                &snapshot.user_configuration(user),
                config,
            ),
            Self::Repay {
                asset,
                amount,
                rate_mode,
                caller,
                on_behalf_of,
            } => ActionValidator::validate_repay(
                asset,
                *amount,
                *rate_mode,
                caller,
                on_behalf_of,
                &market,
            ),
            Self::SwapRateMode {
                asset,
                user,
                current_rate_mode,
            } => ActionValidator::validate_swap_rate_mode(
                asset,
                user,
                *current_rate_mode,
                &market,
                &snapshot.user_configuration(user),
            ),
            Self::SetUseReserveAsCollateral {
                asset,
                user,
                use_as_collateral,
            } => ActionValidator::validate_set_use_reserve_as_collateral(
                asset,
                user,
                *use_as_collateral,
                &market,
                &snapshot.user_configuration(user),
            ),
            Self::Transfer {
                asset,
                from,
                amount,
            } => validate_transfer(asset, from, *amount, snapshot),
            Self::Flashloan { assets, amounts } => {
                ActionValidator::validate_flashloan(assets, amounts)
            }
        }
    }
}

/// Applies the transfer to the sender's claim balance, then checks the
/// sender's health on the result
fn validate_transfer(
    asset: &Address,
    from: &Address,
    amount: U256,
    snapshot: &MarketSnapshot,
) -> Result<(), ValidationError> {
    let market = snapshot.view();
    let reserve = market.reserve(asset)?;

    if amount > market.claim_balance(reserve, from) {
        return Err(ValidationError::InsufficientUserBalance);
    }

    let balances = TransferredBalances {
        inner: market.balances,
        token: reserve.claim_token_address,
        holder: *from,
        amount,
    };
    let after_transfer = MarketView::new(market.reserves, market.oracle, &balances);

    ActionValidator::validate_transfer(from, &after_transfer, &snapshot.user_configuration(from))
}

/// Balances with `amount` of `token` removed from `holder`
struct TransferredBalances<'a> {
    inner: &'a dyn TokenBalance,
    token: Address,
    holder: Address,
    amount: U256,
}

impl TokenBalance for TransferredBalances<'_> {
    fn balance_of(&self, token: &Address, holder: &Address) -> U256 {
        let balance = self.inner.balance_of(token, holder);
        if *token == self.token && *holder == self.holder {
            balance.saturating_sub(self.amount)
        } else {
            balance
        }
    }
}
