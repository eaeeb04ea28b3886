//! Plain-text rendering of an analysis, for chat replies and terminals.
//! Absent values render as `N/A`.

use std::fmt::Display;

use rust_decimal::Decimal;

use crate::model::AnalysisRecord;

const NA: &str = "N/A";

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

fn usd(value: Option<Decimal>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("${:.2}", v.round_dp(2)))
}

fn usd_whole(value: Option<Decimal>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("${}", v.round_dp(0)))
}

fn percent(value: Option<Decimal>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{:+.2}%", v.round_dp(2)))
}

impl AnalysisRecord {
    /// Render a multi-line summary panel
    pub fn summary(&self) -> String {
        let title = self
            .asset
            .as_ref()
            .map_or_else(|| "UNKNOWN".to_string(), |a| a.as_str().to_uppercase());
        let price = &self.price_data;
        let market = &self.market_metrics;
        let social = &self.social_metrics;
        let risk = &self.risk_analysis;

        let mut s = String::new();
        s.push_str(&format!("Market Analysis: {}\n", title));
        s.push_str(&format!("Generated at: {}\n", self.timestamp.to_rfc3339()));
        s.push_str(&format!("  Price:        {}\n", usd(price.current_price)));
        s.push_str(&format!("  24h Change:   {}\n", percent(price.price_change_pct_24h)));
        s.push_str(&format!("  7d Change:    {}\n", percent(price.price_change_pct_7d)));
        s.push_str(&format!("  Volume:       {}\n", usd_whole(market.total_volume)));
        s.push_str(&format!("  Market Cap:   {}\n", usd_whole(market.market_cap)));
        s.push_str(&format!("  Rank:         #{}\n", or_na(market.market_cap_rank)));
        s.push_str(&format!("  Twitter:      {}\n", or_na(social.twitter_followers)));
        s.push_str(&format!("  Reddit:       {}\n", or_na(social.reddit_subscribers)));
        s.push_str(&format!("  Telegram:     {}\n", or_na(social.telegram_user_count)));
        s.push_str(&format!("  Risk Level:   {}\n", risk.risk_level));
        s.push_str(&format!(
            "  Volatility:   {}\n",
            risk.volatility_24h
                .map_or_else(|| NA.to_string(), |v| format!("{:.2}%", v.round_dp(2)))
        ));

        if !self.trading_signals.is_empty() {
            s.push_str("Trading Signals:\n");
            for signal in &self.trading_signals {
                s.push_str(&format!("  • {}\n", signal));
            }
        }

        s
    }
}
