//! Mock Market Data Source
//!
//! For testing and demo purposes. Returns realistic static snapshots and
//! counts how often it was asked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::MarketDataSource;
use crate::error::{FetchError, Result};
use crate::model::{AssetId, MarketSnapshot};

/// Mock source with static snapshots
pub struct MockMarketSource {
    snapshots: HashMap<String, MarketSnapshot>,
    fetches: AtomicUsize,
    unavailable: AtomicBool,
    /// Simulated network latency
    latency: Option<Duration>,
}

impl Default for MockMarketSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketSource {
    /// Preloaded with bitcoin, ethereum, solana and dogecoin
    pub fn new() -> Self {
        let snapshots = ["bitcoin", "ethereum", "solana", "dogecoin"]
            .into_iter()
            .filter_map(|id| base_snapshot(id).map(|s| (id.to_string(), s)))
            .collect();

        Self {
            snapshots,
            fetches: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
            latency: None,
        }
    }

    /// No assets at all; every fetch is `NotFound`
    pub fn empty() -> Self {
        Self {
            snapshots: HashMap::new(),
            ..Self::new()
        }
    }

    pub fn with_snapshot(mut self, id: &str, snapshot: MarketSnapshot) -> Self {
        self.snapshots.insert(id.to_lowercase(), snapshot);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Simulate an upstream outage until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `fetch` calls served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for MockMarketSource {
    async fn fetch(&self, asset: &AssetId) -> Result<MarketSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(FetchError::Source("mock source switched off".into()));
        }

        self.snapshots
            .get(asset.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(asset.to_string()))
    }

    async fn health_check(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}

fn base_snapshot(id: &str) -> Option<MarketSnapshot> {
    let snapshot = match id {
        "bitcoin" => MarketSnapshot {
            current_price: Some(dec!(97500)),
            price_change_pct_24h: Some(dec!(2.5)),
            price_change_pct_7d: Some(dec!(6.1)),
            price_change_pct_30d: Some(dec!(12.4)),
            all_time_high: Some(dec!(108135)),
            all_time_high_change_pct: Some(dec!(-9.8)),
            market_cap: Some(dec!(1930000000000)),
            market_cap_rank: Some(1),
            total_volume: Some(dec!(25000000000)),
            circulating_supply: Some(dec!(19800000)),
            total_supply: Some(dec!(21000000)),
            volume_change_pct_24h: Some(dec!(8.0)),
            twitter_followers: Some(6_500_000),
            reddit_subscribers: Some(5_900_000),
            reddit_active_accounts: Some(4_021),
            telegram_user_count: None,
            coingecko_score: Some(dec!(83.1)),
            community_score: Some(dec!(71.4)),
            alexa_rank: Some(9_440),
        },
        "ethereum" => MarketSnapshot {
            current_price: Some(dec!(3450)),
            price_change_pct_24h: Some(dec!(1.8)),
            price_change_pct_7d: Some(dec!(-3.2)),
            price_change_pct_30d: Some(dec!(9.0)),
            all_time_high: Some(dec!(4878)),
            all_time_high_change_pct: Some(dec!(-29.3)),
            market_cap: Some(dec!(415000000000)),
            market_cap_rank: Some(2),
            total_volume: Some(dec!(15000000000)),
            circulating_supply: Some(dec!(120400000)),
            total_supply: Some(dec!(120400000)),
            volume_change_pct_24h: Some(dec!(-4.5)),
            twitter_followers: Some(3_600_000),
            reddit_subscribers: Some(3_300_000),
            reddit_active_accounts: Some(1_870),
            telegram_user_count: None,
            coingecko_score: Some(dec!(79.2)),
            community_score: Some(dec!(68.0)),
            alexa_rank: None,
        },
        "solana" => MarketSnapshot {
            current_price: Some(dec!(195)),
            price_change_pct_24h: Some(dec!(-11.2)),
            price_change_pct_7d: Some(dec!(-4.0)),
            price_change_pct_30d: Some(dec!(21.7)),
            all_time_high: Some(dec!(263)),
            all_time_high_change_pct: Some(dec!(-25.9)),
            market_cap: Some(dec!(94000000000)),
            market_cap_rank: Some(6),
            total_volume: Some(dec!(11500000000)),
            circulating_supply: Some(dec!(482000000)),
            total_supply: Some(dec!(589000000)),
            volume_change_pct_24h: Some(dec!(63.4)),
            twitter_followers: Some(2_900_000),
            reddit_subscribers: Some(250_000),
            reddit_active_accounts: None,
            telegram_user_count: None,
            coingecko_score: None,
            community_score: None,
            alexa_rank: None,
        },
        "dogecoin" => MarketSnapshot {
            current_price: Some(dec!(0.38)),
            price_change_pct_24h: Some(dec!(12.0)),
            price_change_pct_7d: Some(dec!(18.5)),
            price_change_pct_30d: Some(dec!(-6.0)),
            all_time_high: Some(dec!(0.7316)),
            all_time_high_change_pct: Some(dec!(-48.1)),
            market_cap: Some(dec!(56000000000)),
            market_cap_rank: Some(8),
            total_volume: Some(dec!(9800000000)),
            circulating_supply: Some(dec!(147000000000)),
            total_supply: None,
            volume_change_pct_24h: Some(dec!(-52.0)),
            twitter_followers: Some(4_000_000),
            reddit_subscribers: Some(2_500_000),
            reddit_active_accounts: Some(980),
            telegram_user_count: None,
            coingecko_score: Some(dec!(48.0)),
            community_score: Some(dec!(62.2)),
            alexa_rank: None,
        },
        _ => return None,
    };
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source() {
        let source = MockMarketSource::new();

        let btc = source.fetch(&AssetId::parse("bitcoin").unwrap()).await.unwrap();
        assert_eq!(btc.market_cap_rank, Some(1));
        assert!(btc.current_price.is_some());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_asset() {
        let source = MockMarketSource::new();
        let result = source.fetch(&AssetId::parse("notreal").unwrap()).await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_outage_switch() {
        let source = MockMarketSource::new();
        source.set_unavailable(true);
        assert!(!source.health_check().await);
        assert!(source.fetch(&AssetId::parse("bitcoin").unwrap()).await.is_err());

        source.set_unavailable(false);
        assert!(source.fetch(&AssetId::parse("bitcoin").unwrap()).await.is_ok());
    }
}
