pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_provider, FailoverProvider, FallbackProvider, LiveProvider};
pub use config::toml_config::TomlConfig;
pub use core::query::StatisticsService;
pub use utils::error::{Result, StatsError};
