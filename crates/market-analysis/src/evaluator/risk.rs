//! Risk classification

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MissingMarketCap;
use crate::model::RiskLevel;

const SMALL_CAP: Decimal = dec!(100000000);
const MID_CAP: Decimal = dec!(1000000000);

/// total_volume / market_cap; 0 when either side is missing or the cap is 0
pub fn volume_to_mcap_ratio(total_volume: Option<Decimal>, market_cap: Option<Decimal>) -> Decimal {
    match (total_volume, market_cap) {
        (Some(volume), Some(cap)) if cap > Decimal::ZERO => {
            volume.checked_div(cap).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

/// Weighted risk score, 0..=9
pub fn risk_score(
    price_change_pct_24h: Option<Decimal>,
    volume_to_mcap: Decimal,
    market_cap: Option<Decimal>,
    missing_cap: MissingMarketCap,
) -> u8 {
    let volatility = price_change_pct_24h.map_or(Decimal::ZERO, |p| p.abs());

    let price_score = if volatility > dec!(20) {
        3
    } else if volatility > dec!(10) {
        2
    } else if volatility > dec!(5) {
        1
    } else {
        0
    };

    let volume_score = if volume_to_mcap > dec!(0.3) {
        3
    } else if volume_to_mcap > dec!(0.1) {
        1
    } else {
        0
    };

    let cap_score = match market_cap.filter(|cap| *cap > Decimal::ZERO) {
        Some(cap) if cap < SMALL_CAP => 3,
        Some(cap) if cap < MID_CAP => 2,
        Some(_) => 0,
        None => match missing_cap {
            MissingMarketCap::SmallestTier => 3,
            MissingMarketCap::Exclude => 0,
        },
    };

    price_score + volume_score + cap_score
}

pub fn classify_weighted(
    price_change_pct_24h: Option<Decimal>,
    volume_to_mcap: Decimal,
    market_cap: Option<Decimal>,
    missing_cap: MissingMarketCap,
) -> RiskLevel {
    RiskLevel::from_score(risk_score(price_change_pct_24h, volume_to_mcap, market_cap, missing_cap))
}

/// Price-change-only classification; `Unknown` without a 24h change
pub fn classify_volatility_only(price_change_pct_24h: Option<Decimal>) -> RiskLevel {
    match price_change_pct_24h.map(|p| p.abs()) {
        Some(v) if v > dec!(20) => RiskLevel::High,
        Some(v) if v < dec!(5) => RiskLevel::Low,
        Some(_) => RiskLevel::Medium,
        None => RiskLevel::Unknown,
    }
}
