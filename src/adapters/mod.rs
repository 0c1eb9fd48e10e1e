// Adapters layer: concrete data providers and the policy composing them.

pub mod failover;
pub mod fallback;
pub mod live;
pub mod synthetic;

use crate::domain::ports::{ConfigProvider, DataProvider};
use crate::utils::error::Result;
use std::sync::Arc;

pub use failover::FailoverProvider;
pub use fallback::FallbackProvider;
pub use live::LiveProvider;
pub use synthetic::Dataset;

/// Live sources, backed by seeded synthetic data unless fallback is disabled.
pub fn build_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<Arc<dyn DataProvider>> {
    let live = LiveProvider::from_config(config)?;

    if config.fallback_enabled() {
        tracing::info!(
            "Using live data providers with synthetic fallback (seed {})",
            config.fallback_seed()
        );
        let fallback = FallbackProvider::seeded(config.fallback_seed());
        Ok(Arc::new(FailoverProvider::new(live, fallback)))
    } else {
        tracing::info!("Using live data providers without fallback");
        Ok(Arc::new(live))
    }
}
