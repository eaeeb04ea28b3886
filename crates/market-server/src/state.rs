//! Application State

use std::sync::Arc;

use market_analysis::MarketAnalyzer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis facade; owns the snapshot cache
    pub analyzer: Arc<MarketAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: MarketAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}
