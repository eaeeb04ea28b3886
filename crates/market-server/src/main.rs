//! market-server
//!
//! Axum-based JSON API over the market analysis pipeline, used by the chat
//! layer to enrich replies and by the dashboard to render snapshot panels.

mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_analysis::{
    AnalyzerConfig, CoinGeckoClient, MarketAnalyzer, MarketDataSource, MockMarketSource,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize market data source
    let source: Arc<dyn MarketDataSource> = match std::env::var("MARKET_SOURCE").as_deref() {
        Ok("mock") => {
            tracing::warn!("⚠ Using mock market data - prices are static");
            Arc::new(MockMarketSource::new())
        }
        _ => Arc::new(CoinGeckoClient::from_env()?),
    };

    // Verify upstream connection
    if source.health_check().await {
        tracing::info!("✓ Connected to {}", source.name());
    } else {
        tracing::warn!("⚠ {} not reachable - analyses will be empty until it recovers", source.name());
    }

    let analyzer = MarketAnalyzer::with_config(source, AnalyzerConfig::from_env());
    let app = routes::router(AppState::new(analyzer));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 market-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  GET  /api/analysis/{{coin}}  - Full market analysis");
    tracing::info!("  GET  /api/social/{{coin}}    - Social impact");
    tracing::info!("  GET  /api/price/{{coin}}     - Current USD price");
    tracing::info!("  POST /api/analyze          - Analyze the coin named in a message");
    tracing::info!("  GET  /api/market-data      - Dashboard panel (bitcoin)");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
