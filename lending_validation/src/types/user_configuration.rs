use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{constants::MAX_RESERVES, errors::ConfigurationError, interfaces::UserConfigStore};

/// Every even bit set: the "borrowing" bit of each reserve
const BORROWING_MASK: U256 = U256::from_limbs([0x5555_5555_5555_5555; 4]);

/// Per-user bitmap, two bits per reserve index.
///
/// Bit `2 * index` marks the reserve as borrowed, bit `2 * index + 1` marks it
/// as used as collateral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserConfiguration {
    data: U256,
}

impl UserConfiguration {
    pub fn from_bitmap(data: U256) -> Self {
        Self { data }
    }

    pub fn bitmap(&self) -> U256 {
        self.data
    }

    pub fn set_borrowing(&mut self, index: u8, borrowing: bool) -> Result<(), ConfigurationError> {
        let bit = Self::borrowing_bit(index)?;
        self.data.set_bit(bit, borrowing);
        Ok(())
    }

    pub fn set_using_as_collateral(
        &mut self,
        index: u8,
        using_as_collateral: bool,
    ) -> Result<(), ConfigurationError> {
        let bit = Self::borrowing_bit(index)? + 1;
        self.data.set_bit(bit, using_as_collateral);
        Ok(())
    }

    pub fn is_using_as_collateral_or_borrowing(&self, index: u8) -> bool {
        self.is_borrowing(index) || self.is_using_as_collateral(index)
    }

    fn borrowing_bit(index: u8) -> Result<usize, ConfigurationError> {
        if index >= MAX_RESERVES {
            return Err(ConfigurationError::InvalidReserveIndex(index));
        }
        Ok(usize::from(index) * 2)
    }
}

impl UserConfigStore for UserConfiguration {
    fn is_using_as_collateral(&self, index: u8) -> bool {
        Self::borrowing_bit(index)
            .map(|bit| self.data.bit(bit + 1))
            .unwrap_or(false)
    }

    fn is_borrowing(&self, index: u8) -> bool {
        Self::borrowing_bit(index)
            .map(|bit| self.data.bit(bit))
            .unwrap_or(false)
    }

    fn is_borrowing_any(&self) -> bool {
        !(self.data & BORROWING_MASK).is_zero()
    }

    fn is_empty(&self) -> bool {
        self.data.is_zero()
    }
}
