#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_UHR_ENDPOINT: &str = "https://api.uhr.se/antagning";
pub const DEFAULT_SCB_ENDPOINT: &str = "https://api.scb.se/OV0104/v1/doris/sv/ssd";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FALLBACK_SEED: u64 = 2024;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
