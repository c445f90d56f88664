use std::path::PathBuf;

use anyhow::{ensure, Result};
use lending_validation::{constants::MAX_PERCENTAGE_BPS, ValidatorConfig};

use super::env_helper::{load_env_var, load_env_var_or};

#[derive(Debug, Clone)]
pub struct LocalConfig {
    pub snapshot_path: PathBuf,
    pub snapshot_refresh_interval: u64,
    pub max_stable_loan_percent: u16,
    pub max_cap_on_health_factor: u64,
    pub port: u16,
}

impl LocalConfig {
    pub fn load_from_env() -> Result<Self> {
        let config = Self {
            snapshot_path: load_env_var("SNAPSHOT_PATH")?,
            snapshot_refresh_interval: load_env_var("SNAPSHOT_REFRESH_INTERVAL")?,
            max_stable_loan_percent: load_env_var("MAX_STABLE_LOAN_PERCENT")?,
            max_cap_on_health_factor: load_env_var("MAX_CAP_ON_HEALTH_FACTOR")?,
            port: load_env_var_or("PORT", 8080)?,
        };

        ensure!(
            config.max_stable_loan_percent <= MAX_PERCENTAGE_BPS,
            "MAX_STABLE_LOAN_PERCENT must be at most {} bps, got {}",
            MAX_PERCENTAGE_BPS,
            config.max_stable_loan_percent
        );
        ensure!(
            config.snapshot_refresh_interval > 0,
            "SNAPSHOT_REFRESH_INTERVAL must be positive"
        );

        Ok(config)
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            max_stable_loan_percent: self.max_stable_loan_percent,
        }
    }
}
