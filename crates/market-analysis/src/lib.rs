//! # market-analysis
//!
//! Turns raw third-party market data into structured price, social and risk
//! signals for a crypto chat assistant.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  MarketAnalyzer::analyze("bitcoin")                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  AnalysisCache ──miss──▶ MarketDataSource (CoinGecko)       │
//! │        │                        │                           │
//! │        └──── MarketSnapshot ◀───┘                           │
//! │                    │                                        │
//! │               Evaluator  ──▶ risk level + trading signals   │
//! │                    │                                        │
//! │             AnalysisRecord (always produced)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Risk score
//!
//! ```text
//! |24h change|  > 20%: +3   > 10%: +2   > 5%: +1
//! volume / cap  > 0.3: +3   > 0.1: +1
//! market cap    < $100M: +3   < $1B: +2
//!
//! ≥ 7 Very High   ≥ 5 High   ≥ 3 Medium   else Low
//! ```
//!
//! Fetch failures never escape [`MarketAnalyzer::analyze`]; the caller gets a
//! record with empty fields and risk level `Unknown`.

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod model;
pub mod report;
pub mod source;

pub use analyzer::{AnalyzerConfig, MarketAnalyzer};
pub use cache::AnalysisCache;
pub use error::{FetchError, FetchErrorKind, Result};
pub use evaluator::{social_sentiment, Evaluator, MissingMarketCap, RiskPolicy, SignalPolicy};
pub use extract::extract_asset_id;
pub use model::{
    AnalysisRecord, AssetId, CommunityTier, MarketMetrics, MarketSnapshot, PriceData, RiskAnalysis,
    RiskLevel, SocialImpact, SocialMetrics, SocialSentiment,
};
pub use source::{CoinGeckoClient, CoinGeckoConfig, MarketDataSource, MockMarketSource};
