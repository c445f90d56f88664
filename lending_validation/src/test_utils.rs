use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use crate::{
    constants::WAD,
    interfaces::{MarketView, PriceOracle, ReserveStore, TokenBalance},
    types::{Reserve, ReserveConfiguration, ReserveFlags},
};

pub const USER: Address = Address::repeat_byte(0xAA);
pub const OTHER_USER: Address = Address::repeat_byte(0xBB);

/// In-memory market used by the unit tests
#[derive(Default, Clone)]
pub struct MarketFixture {
    reserves: HashMap<Address, Reserve>,
    list: Vec<Address>,
    prices: HashMap<Address, U256>,
    balances: HashMap<(Address, Address), U256>,
}

impl MarketFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reserve(&mut self, reserve: Reserve, price: U256) -> &mut Self {
        self.list.push(reserve.underlying_asset);
        self.prices.insert(reserve.underlying_asset, price);
        self.reserves.insert(reserve.underlying_asset, reserve);
        self
    }

    pub fn reserve_mut(&mut self, asset: &Address) -> &mut Reserve {
        self.reserves.get_mut(asset).expect("reserve listed")
    }

    pub fn set_price(&mut self, asset: Address, price: U256) -> &mut Self {
        self.prices.insert(asset, price);
        self
    }

    pub fn remove_price(&mut self, asset: &Address) -> &mut Self {
        self.prices.remove(asset);
        self
    }

    pub fn set_balance(&mut self, token: Address, holder: Address, amount: U256) -> &mut Self {
        self.balances.insert((token, holder), amount);
        self
    }

    pub fn set_claim_balance(&mut self, asset: Address, user: Address, amount: U256) -> &mut Self {
        let token = self.reserves[&asset].claim_token_address;
        self.set_balance(token, user, amount)
    }

    pub fn set_stable_debt(&mut self, asset: Address, user: Address, amount: U256) -> &mut Self {
        let token = self.reserves[&asset].stable_debt_token_address;
        self.set_balance(token, user, amount)
    }

    pub fn set_variable_debt(&mut self, asset: Address, user: Address, amount: U256) -> &mut Self {
        let token = self.reserves[&asset].variable_debt_token_address;
        self.set_balance(token, user, amount)
    }

    pub fn set_liquidity(&mut self, asset: Address, amount: U256) -> &mut Self {
        let token = self.reserves[&asset].claim_token_address;
        self.set_balance(asset, token, amount)
    }

    pub fn view(&self) -> MarketView<'_> {
        MarketView::new(self, self, self)
    }
}

impl ReserveStore for MarketFixture {
    fn reserve(&self, asset: &Address) -> Option<&Reserve> {
        self.reserves.get(asset)
    }

    fn reserves_list(&self) -> &[Address] {
        &self.list
    }
}

impl PriceOracle for MarketFixture {
    fn asset_price(&self, asset: &Address) -> Option<U256> {
        self.prices.get(asset).copied()
    }
}

impl TokenBalance for MarketFixture {
    fn balance_of(&self, token: &Address, holder: &Address) -> U256 {
        self.balances
            .get(&(*token, *holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }
}

pub fn open_flags() -> ReserveFlags {
    ReserveFlags {
        active: true,
        frozen: false,
        borrowing_enabled: true,
        stable_rate_borrowing_enabled: true,
    }
}

/// Reserve number `id` with distinct token addresses derived from it
pub fn reserve(id: u8, ltv: u16, liquidation_threshold: u16, decimals: u8) -> Reserve {
    Reserve {
        underlying_asset: Address::with_last_byte(id),
        claim_token_address: Address::with_last_byte(0x40 + id),
        stable_debt_token_address: Address::with_last_byte(0x80 + id),
        variable_debt_token_address: Address::with_last_byte(0xC0 + id),
        index: id,
        configuration: ReserveConfiguration::new(
            ltv,
            liquidation_threshold,
            10_500,
            decimals,
            1_000,
            open_flags(),
        )
        .expect("valid test configuration"),
    }
}

/// `n` whole units of an asset with `decimals` decimals
pub fn units(n: u64, decimals: u8) -> U256 {
    U256::from(n) * U256::from(10).pow(U256::from(decimals))
}

/// Price of `n` reference units per asset unit
pub fn price(n: u64) -> U256 {
    U256::from(n) * WAD
}
