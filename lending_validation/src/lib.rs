//! Validation layer of a pooled lending market.
//!
//! [`account_aggregator::AccountAggregator`] turns a user's balances into a
//! risk position and [`action_validator::ActionValidator`] guards every
//! user-facing action against it. Both are stateless and only read from the
//! collaborators described in [`interfaces`].

pub mod account_aggregator;
pub mod action_validator;
pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod math;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use account_aggregator::AccountAggregator;
pub use action_validator::{ActionValidator, ValidatorConfig};
pub use errors::{ConfigurationError, MathError, ValidationError};
pub use interfaces::{MarketView, PriceOracle, ReserveStore, TokenBalance, UserConfigStore};
