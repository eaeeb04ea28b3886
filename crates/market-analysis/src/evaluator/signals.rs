//! Trading signal generation
//!
//! Signals are advisory strings, emitted in rule order. A rule whose inputs
//! are missing is skipped.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::MarketSnapshot;

/// One decimal place, rounded as the binary float of the same literal
/// rounds (`-12.35` prints `-12.3`, `15.05` prints `15.1`).
fn pct(value: Decimal) -> String {
    match value.to_string().parse::<f64>() {
        Ok(float) => format!("{float:.1}"),
        Err(_) => format!("{:.1}", value.round_dp(1)),
    }
}

/// Volatility above 10% and volume swings beyond ±50%
pub fn threshold_signals(snapshot: &MarketSnapshot) -> Vec<String> {
    let mut signals = Vec::new();

    if let Some(price_change) = snapshot.price_change_pct_24h {
        if price_change.abs() > dec!(10) {
            signals.push(format!(
                "High volatility detected: {}% price change in 24h",
                pct(price_change)
            ));
        }
    }

    if let Some(volume_change) = snapshot.volume_change_pct_24h {
        if volume_change > dec!(50) {
            signals.push(format!("Significant volume increase: {}% in 24h", pct(volume_change)));
        } else if volume_change < dec!(-50) {
            signals.push(format!("Significant volume decrease: {}% in 24h", pct(volume_change)));
        }
    }

    signals
}

/// Volume above 20% paired with the direction of the 24h price move
pub fn volume_momentum_signals(snapshot: &MarketSnapshot) -> Vec<String> {
    let (Some(volume_change), Some(price_change)) =
        (snapshot.volume_change_pct_24h, snapshot.price_change_pct_24h)
    else {
        return Vec::new();
    };

    if volume_change <= dec!(20) {
        return Vec::new();
    }

    if price_change > Decimal::ZERO {
        vec!["High volume with price increase - potential bullish signal".into()]
    } else if price_change < Decimal::ZERO {
        vec!["High volume with price decrease - potential bearish signal".into()]
    } else {
        Vec::new()
    }
}
