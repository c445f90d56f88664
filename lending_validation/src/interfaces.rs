//! Collaborators the validation layer reads from.
//!
//! The validator never owns or mutates them; callers pass borrowed handles for
//! the duration of a single call and must keep them consistent for that call.

use alloy::primitives::{Address, U256};

use crate::{
    errors::ValidationError,
    types::{Reserve, ReserveFlags},
};

/// Listed reserves, in the order their positions are scanned
pub trait ReserveStore {
    fn reserve(&self, asset: &Address) -> Option<&Reserve>;

    fn reserves_list(&self) -> &[Address];

    fn flags(&self, asset: &Address) -> Option<ReserveFlags> {
        self.reserve(asset).map(Reserve::flags)
    }

    fn ltv(&self, asset: &Address) -> Option<u16> {
        self.reserve(asset).map(|reserve| reserve.configuration.ltv)
    }

    fn liquidation_threshold(&self, asset: &Address) -> Option<u16> {
        self.reserve(asset)
            .map(|reserve| reserve.configuration.liquidation_threshold)
    }
}

pub trait UserConfigStore {
    fn is_using_as_collateral(&self, index: u8) -> bool;

    fn is_borrowing(&self, index: u8) -> bool;

    fn is_borrowing_any(&self) -> bool;

    fn is_empty(&self) -> bool;
}

/// Price of one whole unit of an asset, in the reference currency (WAD)
pub trait PriceOracle {
    fn asset_price(&self, asset: &Address) -> Option<U256>;
}

/// Live balances of claim tokens, debt tokens and underlying assets.
/// Debt token balances already include accrued interest.
pub trait TokenBalance {
    fn balance_of(&self, token: &Address, holder: &Address) -> U256;
}

/// Read-only handles to the market collaborators for one validation call
#[derive(Clone, Copy)]
pub struct MarketView<'a> {
    pub reserves: &'a dyn ReserveStore,
    pub oracle: &'a dyn PriceOracle,
    pub balances: &'a dyn TokenBalance,
}

impl<'a> MarketView<'a> {
    pub fn new(
        reserves: &'a dyn ReserveStore,
        oracle: &'a dyn PriceOracle,
        balances: &'a dyn TokenBalance,
    ) -> Self {
        Self {
            reserves,
            oracle,
            balances,
        }
    }

    pub fn reserve(&self, asset: &Address) -> Result<&'a Reserve, ValidationError> {
        self.reserves
            .reserve(asset)
            .ok_or(ValidationError::UnknownReserve(*asset))
    }

    pub fn asset_price(&self, asset: &Address) -> Result<U256, ValidationError> {
        self.oracle
            .asset_price(asset)
            .ok_or(ValidationError::MissingPrice(*asset))
    }

    /// Claim token balance, equal to the redeemable underlying amount
    pub fn claim_balance(&self, reserve: &Reserve, user: &Address) -> U256 {
        self.balances
            .balance_of(&reserve.claim_token_address, user)
    }

    /// `(stable, variable)` debt of the user in the reserve
    pub fn debt_balances(&self, reserve: &Reserve, user: &Address) -> (U256, U256) {
        (
            self.balances
                .balance_of(&reserve.stable_debt_token_address, user),
            self.balances
                .balance_of(&reserve.variable_debt_token_address, user),
        )
    }

    /// Underlying held by the claim token contract
    pub fn available_liquidity(&self, reserve: &Reserve) -> U256 {
        self.balances
            .balance_of(&reserve.underlying_asset, &reserve.claim_token_address)
    }
}
