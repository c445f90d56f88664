mod action;
mod position;
mod reserve;
mod user_configuration;

pub use action::{InterestRateMode, RepayAmount};
pub use position::AccountPosition;
pub use reserve::{Reserve, ReserveConfiguration, ReserveFlags};
pub use user_configuration::UserConfiguration;
