pub mod api;
pub mod config;
pub mod snapshot;
pub mod snapshot_refresher;
pub mod utils;
