//! Market Analysis Facade
//!
//! Orchestrates source → cache → evaluator and is the error boundary of the
//! pipeline: `analyze` always returns a well-formed `AnalysisRecord`.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::cache::{AnalysisCache, DEFAULT_TTL};
use crate::error::Result;
use crate::evaluator::{Evaluator, MissingMarketCap, RiskPolicy, SignalPolicy};
use crate::model::{AnalysisRecord, AssetId, MarketSnapshot, SocialImpact};
use crate::source::MarketDataSource;

/// Analyzer configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// How long a fetched snapshot is served from cache
    pub cache_ttl: Duration,
    pub risk_policy: RiskPolicy,
    pub signal_policy: SignalPolicy,
    pub missing_market_cap: MissingMarketCap,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            risk_policy: RiskPolicy::default(),
            signal_policy: SignalPolicy::default(),
            missing_market_cap: MissingMarketCap::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unparsable values fall back to defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring invalid {}={:?}", key, value);
                    None
                }
            }
        }

        let defaults = Self::default();
        Self {
            cache_ttl: parsed("ANALYSIS_CACHE_TTL_SECS", var("ANALYSIS_CACHE_TTL_SECS"))
                .map_or(defaults.cache_ttl, Duration::from_secs),
            risk_policy: parsed("RISK_POLICY", var("RISK_POLICY")).unwrap_or(defaults.risk_policy),
            signal_policy: parsed("SIGNAL_POLICY", var("SIGNAL_POLICY"))
                .unwrap_or(defaults.signal_policy),
            missing_market_cap: parsed("MISSING_MARKET_CAP", var("MISSING_MARKET_CAP"))
                .unwrap_or(defaults.missing_market_cap),
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.risk_policy, self.signal_policy, self.missing_market_cap)
    }
}

/// Fetch, cache and evaluate market data for assets
pub struct MarketAnalyzer {
    source: Arc<dyn MarketDataSource>,
    cache: AnalysisCache,
    evaluator: Evaluator,
}

impl MarketAnalyzer {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self::with_config(source, AnalyzerConfig::default())
    }

    pub fn with_config(source: Arc<dyn MarketDataSource>, config: AnalyzerConfig) -> Self {
        info!(
            source = source.name(),
            ttl_secs = config.cache_ttl.as_secs(),
            risk_policy = %config.risk_policy,
            signal_policy = %config.signal_policy,
            missing_market_cap = %config.missing_market_cap,
            "market analyzer configured"
        );

        Self {
            evaluator: config.evaluator(),
            cache: AnalysisCache::new(config.cache_ttl),
            source,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn source_healthy(&self) -> bool {
        self.source.health_check().await
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn evaluator(&self) -> Evaluator {
        self.evaluator
    }

    /// Snapshot for `asset`, served from cache when fresh
    pub async fn snapshot(&self, asset: &AssetId) -> Result<Arc<MarketSnapshot>> {
        self.cache
            .get_or_fetch(asset, || self.source.fetch(asset))
            .await
    }

    /// Analysis that surfaces fetch failures instead of hiding them
    pub async fn try_analyze(&self, asset: &AssetId) -> Result<AnalysisRecord> {
        let snapshot = self.snapshot(asset).await?;
        Ok(self.build_record(asset.clone(), &snapshot))
    }

    /// Analysis for `asset`; an empty `Unknown`-risk record when no data is available
    pub async fn analyze(&self, asset: &AssetId) -> AnalysisRecord {
        match self.try_analyze(asset).await {
            Ok(record) => record,
            Err(e) => {
                warn!(%asset, kind = ?e.kind(), "analysis unavailable: {}", e);
                AnalysisRecord::unavailable(Some(asset.clone()))
            }
        }
    }

    /// `analyze` for raw user input
    pub async fn analyze_str(&self, raw: &str) -> AnalysisRecord {
        match AssetId::parse(raw) {
            Ok(asset) => self.analyze(&asset).await,
            Err(e) => {
                warn!("analysis unavailable: {}", e);
                AnalysisRecord::unavailable(None)
            }
        }
    }

    /// Project a snapshot into a record. Deterministic apart from the timestamp.
    pub fn build_record(&self, asset: AssetId, snapshot: &MarketSnapshot) -> AnalysisRecord {
        let (risk_analysis, trading_signals) = self.evaluator.evaluate(snapshot);
        AnalysisRecord::from_snapshot(asset, snapshot, risk_analysis, trading_signals)
    }

    /// Community reach and upstream scores; empty when no data is available
    pub async fn social_impact(&self, asset: &AssetId) -> SocialImpact {
        match self.snapshot(asset).await {
            Ok(snapshot) => SocialImpact::from(snapshot.as_ref()),
            Err(e) => {
                warn!(%asset, "social impact unavailable: {}", e);
                SocialImpact::default()
            }
        }
    }

    /// Current USD price, if known
    pub async fn price(&self, asset: &AssetId) -> Option<Decimal> {
        match self.snapshot(asset).await {
            Ok(snapshot) => snapshot.current_price,
            Err(e) => {
                warn!(%asset, "price unavailable: {}", e);
                None
            }
        }
    }
}
