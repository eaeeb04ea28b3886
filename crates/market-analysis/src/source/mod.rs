//! Market Data Sources
//!
//! Abstractions and implementations for upstream market data APIs.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use mock::MockMarketSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AssetId, MarketSnapshot};

/// Market data source trait (Strategy pattern)
///
/// Fetching has no side effects, so callers may retry freely.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch a normalized snapshot for one asset
    async fn fetch(&self, asset: &AssetId) -> Result<MarketSnapshot>;

    /// Check if the upstream is reachable
    async fn health_check(&self) -> bool;

    /// Source name
    fn name(&self) -> &str;
}
