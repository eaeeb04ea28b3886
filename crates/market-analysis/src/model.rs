//! Domain Models
//!
//! Core data types for market analysis.
//! Uses `rust_decimal` for all monetary values and percentages - never use f64 for money!

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};
use crate::evaluator::social_sentiment;

/// Normalized asset identifier in the upstream namespace (e.g., "bitcoin", "usd-coin")
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(pub(crate) String);

impl AssetId {
    /// Trim and lowercase `raw`; rejects empty input and characters that
    /// cannot appear in an upstream id.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');

        if normalized.is_empty() || !normalized.chars().all(valid_char) {
            return Err(FetchError::InvalidAsset(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One fetched, point-in-time view of an asset.
///
/// Every field is optional: the upstream source omits keys freely.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Current price in USD
    pub current_price: Option<Decimal>,
    pub price_change_pct_24h: Option<Decimal>,
    pub price_change_pct_7d: Option<Decimal>,
    pub price_change_pct_30d: Option<Decimal>,
    pub all_time_high: Option<Decimal>,
    pub all_time_high_change_pct: Option<Decimal>,

    pub market_cap: Option<Decimal>,
    /// 1 = largest
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub volume_change_pct_24h: Option<Decimal>,

    pub twitter_followers: Option<u64>,
    pub reddit_subscribers: Option<u64>,
    pub reddit_active_accounts: Option<u64>,
    pub telegram_user_count: Option<u64>,

    /// Upstream composite scores, used by the social impact view
    pub coingecko_score: Option<Decimal>,
    pub community_score: Option<Decimal>,
    pub alexa_rank: Option<u64>,
}

/// Price fields of an analysis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub current_price: Option<Decimal>,
    pub price_change_pct_24h: Option<Decimal>,
    pub price_change_pct_7d: Option<Decimal>,
    pub price_change_pct_30d: Option<Decimal>,
    pub all_time_high: Option<Decimal>,
    pub all_time_high_change_pct: Option<Decimal>,
}

/// Market cap, volume and supply fields of an analysis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub market_cap: Option<Decimal>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub volume_change_pct_24h: Option<Decimal>,
}

/// Community size fields of an analysis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMetrics {
    pub twitter_followers: Option<u64>,
    pub reddit_subscribers: Option<u64>,
    pub reddit_active_accounts: Option<u64>,
    pub telegram_user_count: Option<u64>,
}

impl From<&MarketSnapshot> for PriceData {
    fn from(s: &MarketSnapshot) -> Self {
        Self {
            current_price: s.current_price,
            price_change_pct_24h: s.price_change_pct_24h,
            price_change_pct_7d: s.price_change_pct_7d,
            price_change_pct_30d: s.price_change_pct_30d,
            all_time_high: s.all_time_high,
            all_time_high_change_pct: s.all_time_high_change_pct,
        }
    }
}

impl From<&MarketSnapshot> for MarketMetrics {
    fn from(s: &MarketSnapshot) -> Self {
        Self {
            market_cap: s.market_cap,
            market_cap_rank: s.market_cap_rank,
            total_volume: s.total_volume,
            circulating_supply: s.circulating_supply,
            total_supply: s.total_supply,
            volume_change_pct_24h: s.volume_change_pct_24h,
        }
    }
}

impl From<&MarketSnapshot> for SocialMetrics {
    fn from(s: &MarketSnapshot) -> Self {
        Self {
            twitter_followers: s.twitter_followers,
            reddit_subscribers: s.reddit_subscribers,
            reddit_active_accounts: s.reddit_active_accounts,
            telegram_user_count: s.telegram_user_count,
        }
    }
}

/// Ordinal risk classification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Map a weighted risk score onto a level
    pub fn from_score(score: u8) -> Self {
        match score {
            7.. => RiskLevel::VeryHigh,
            5..=6 => RiskLevel::High,
            3..=4 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk section of an analysis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_level: RiskLevel,

    /// Absolute 24h price change percentage
    pub volatility_24h: Option<Decimal>,

    /// total_volume / market_cap, 0 when the cap is missing or zero
    pub volume_to_mcap_ratio: Option<Decimal>,
}

/// Unified output of the analysis pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetId>,
    pub timestamp: DateTime<Utc>,
    pub price_data: PriceData,
    pub market_metrics: MarketMetrics,
    pub social_metrics: SocialMetrics,
    pub risk_analysis: RiskAnalysis,
    pub trading_signals: Vec<String>,
}

impl AnalysisRecord {
    /// The record returned when no data could be fetched
    pub fn unavailable(asset: Option<AssetId>) -> Self {
        Self {
            asset,
            timestamp: Utc::now(),
            price_data: PriceData::default(),
            market_metrics: MarketMetrics::default(),
            social_metrics: SocialMetrics::default(),
            risk_analysis: RiskAnalysis::default(),
            trading_signals: Vec::new(),
        }
    }

    /// Project a snapshot into a record with already evaluated risk and signals
    pub fn from_snapshot(
        asset: AssetId,
        snapshot: &MarketSnapshot,
        risk_analysis: RiskAnalysis,
        trading_signals: Vec<String>,
    ) -> Self {
        Self {
            asset: Some(asset),
            timestamp: Utc::now(),
            price_data: snapshot.into(),
            market_metrics: snapshot.into(),
            social_metrics: snapshot.into(),
            risk_analysis,
            trading_signals,
        }
    }

    /// True when this is the empty record of a failed fetch.
    ///
    /// Evaluated records always carry a volatility figure, even for a
    /// snapshot with no fields, so its absence marks the failure.
    pub fn is_unavailable(&self) -> bool {
        self.risk_analysis.volatility_24h.is_none()
    }
}

/// Community size or activity bucket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityTier {
    #[default]
    Low,
    Medium,
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

/// Community sentiment derived from follower and activity counts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSentiment {
    /// 0..=6: community strength (up to 3) plus engagement (up to 3)
    pub overall_score: u8,
    pub community_strength: CommunityTier,
    pub engagement_level: CommunityTier,
    pub potential_signals: Vec<String>,
}

/// Social reach view of an asset
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialImpact {
    pub social_score: Option<Decimal>,
    pub community_score: Option<Decimal>,
    pub social_metrics: SocialMetrics,
    /// Alexa rank from the upstream public interest stats
    pub public_interest: Option<u64>,
    pub sentiment: SocialSentiment,
}

impl From<&MarketSnapshot> for SocialImpact {
    fn from(s: &MarketSnapshot) -> Self {
        let social_metrics = SocialMetrics::from(s);
        Self {
            social_score: s.coingecko_score,
            community_score: s.community_score,
            sentiment: social_sentiment(&social_metrics),
            social_metrics,
            public_interest: s.alexa_rank,
        }
    }
}
