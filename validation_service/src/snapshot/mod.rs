use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use alloy::primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use lending_validation::{
    constants::MAX_RESERVES,
    interfaces::{MarketView, PriceOracle, ReserveStore, TokenBalance},
    types::{Reserve, UserConfiguration},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Balance of `token` held by `holder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub token: Address,
    pub holder: Address,
    pub amount: U256,
}

/// On-disk layout of a market snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub block_number: u64,
    /// Listed reserves, in scan order
    pub reserves: Vec<Reserve>,
    pub prices: HashMap<Address, U256>,
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
    #[serde(default)]
    pub user_configurations: HashMap<Address, UserConfiguration>,
}

/// Immutable, indexed view of the market at one block.
///
/// Serves as every collaborator the validation layer reads from. A snapshot is
/// never mutated once built; refreshes swap in a new one.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub block_number: u64,
    pub loaded_at: DateTime<Utc>,
    reserves: HashMap<Address, Reserve>,
    reserves_list: Vec<Address>,
    prices: HashMap<Address, U256>,
    balances: HashMap<(Address, Address), U256>,
    user_configurations: HashMap<Address, UserConfiguration>,
}

impl MarketSnapshot {
    /// Reads and indexes the snapshot stored at `path`
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let file: SnapshotFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        let snapshot = Self::from_file(file)?;

        info!(
            "Loaded snapshot at block {} with {} reserves and {} users",
            snapshot.block_number,
            snapshot.reserves_list.len(),
            snapshot.user_configurations.len()
        );
        Ok(snapshot)
    }

    /// Indexes a parsed snapshot, rejecting duplicate assets and reserve
    /// indexes outside the user configuration bitmap
    pub fn from_file(file: SnapshotFile) -> Result<Self> {
        let mut reserves = HashMap::with_capacity(file.reserves.len());
        let mut reserves_list = Vec::with_capacity(file.reserves.len());
        let mut indexes = HashSet::new();

        for reserve in file.reserves {
            if reserve.index >= MAX_RESERVES {
                bail!(
                    "Reserve {} has index {}, at most {} reserves are supported",
                    reserve.underlying_asset,
                    reserve.index,
                    MAX_RESERVES
                );
            }
            if !indexes.insert(reserve.index) {
                bail!("Reserve index {} is listed twice", reserve.index);
            }
            if reserves.contains_key(&reserve.underlying_asset) {
                bail!("Reserve {} is listed twice", reserve.underlying_asset);
            }

            reserves_list.push(reserve.underlying_asset);
            reserves.insert(reserve.underlying_asset, reserve);
        }

        let balances = file
            .balances
            .into_iter()
            .map(|entry| ((entry.token, entry.holder), entry.amount))
            .collect();

        Ok(Self {
            block_number: file.block_number,
            loaded_at: Utc::now(),
            reserves,
            reserves_list,
            prices: file.prices,
            balances,
            user_configurations: file.user_configurations,
        })
    }

    pub fn view(&self) -> MarketView<'_> {
        MarketView::new(self, self, self)
    }

    /// Configuration bitmap of `user`, empty for unknown accounts
    pub fn user_configuration(&self, user: &Address) -> UserConfiguration {
        self.user_configurations
            .get(user)
            .copied()
            .unwrap_or_default()
    }

    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.loaded_at).num_seconds()
    }
}

impl ReserveStore for MarketSnapshot {
    fn reserve(&self, asset: &Address) -> Option<&Reserve> {
        self.reserves.get(asset)
    }

    fn reserves_list(&self) -> &[Address] {
        &self.reserves_list
    }
}

impl PriceOracle for MarketSnapshot {
    fn asset_price(&self, asset: &Address) -> Option<U256> {
        self.prices.get(asset).copied()
    }
}

impl TokenBalance for MarketSnapshot {
    fn balance_of(&self, token: &Address, holder: &Address) -> U256 {
        self.balances
            .get(&(*token, *holder))
            .copied()
            .unwrap_or_default()
    }
}
