//! Risk & Signal Evaluation
//!
//! Pure, synchronous scoring over a `MarketSnapshot`. Each evaluator is
//! built with exactly one risk policy and one signal policy. Community
//! sentiment is scored separately from `SocialMetrics`.

mod risk;
mod signals;
mod social;

pub use risk::{classify_volatility_only, classify_weighted, risk_score, volume_to_mcap_ratio};
pub use signals::{threshold_signals, volume_momentum_signals};
pub use social::{social_sentiment, total_followers, HIGH_ENGAGEMENT_SIGNAL};

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{MarketSnapshot, RiskAnalysis};

/// How the risk level is derived
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskPolicy {
    /// Score price volatility, volume/market-cap ratio and market cap size
    #[default]
    Weighted,
    /// Only |24h change|: >20 High, <5 Low, else Medium
    VolatilityOnly,
}

/// Which family of trading signals is emitted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalPolicy {
    /// Volatility above 10% and volume swings beyond ±50%
    #[default]
    Threshold,
    /// Volume above 20% combined with the direction of the price move
    VolumeMomentum,
}

/// What a missing or zero market cap contributes to the weighted score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingMarketCap {
    /// Treat as the smallest cap tier (+3)
    #[default]
    SmallestTier,
    /// Leave the market cap term out of the score
    Exclude,
}

macro_rules! policy_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace('_', "-").as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!("unknown {} {:?}", stringify!($ty), other)),
                }
            }
        }
    };
}

policy_names!(RiskPolicy { Weighted => "weighted", VolatilityOnly => "volatility-only" });
policy_names!(SignalPolicy { Threshold => "threshold", VolumeMomentum => "volume-momentum" });
policy_names!(MissingMarketCap { SmallestTier => "smallest-tier", Exclude => "exclude" });

/// Snapshot evaluator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluator {
    pub risk_policy: RiskPolicy,
    pub signal_policy: SignalPolicy,
    pub missing_market_cap: MissingMarketCap,
}

impl Evaluator {
    pub fn new(
        risk_policy: RiskPolicy,
        signal_policy: SignalPolicy,
        missing_market_cap: MissingMarketCap,
    ) -> Self {
        Self {
            risk_policy,
            signal_policy,
            missing_market_cap,
        }
    }

    /// Risk analysis and trading signals for one snapshot
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> (RiskAnalysis, Vec<String>) {
        (self.risk(snapshot), self.signals(snapshot))
    }

    pub fn risk(&self, snapshot: &MarketSnapshot) -> RiskAnalysis {
        let price_change = snapshot.price_change_pct_24h;
        let ratio = volume_to_mcap_ratio(snapshot.total_volume, snapshot.market_cap);

        let risk_level = match self.risk_policy {
            RiskPolicy::Weighted => {
                classify_weighted(price_change, ratio, snapshot.market_cap, self.missing_market_cap)
            }
            RiskPolicy::VolatilityOnly => classify_volatility_only(price_change),
        };

        RiskAnalysis {
            risk_level,
            volatility_24h: Some(price_change.map_or(Decimal::ZERO, |p| p.abs())),
            volume_to_mcap_ratio: Some(ratio),
        }
    }

    pub fn signals(&self, snapshot: &MarketSnapshot) -> Vec<String> {
        match self.signal_policy {
            SignalPolicy::Threshold => threshold_signals(snapshot),
            SignalPolicy::VolumeMomentum => volume_momentum_signals(snapshot),
        }
    }
}
