//! HTTP Handlers
//!
//! Fetch failures are not HTTP errors here: the analyzer folds them into
//! empty records, which the client renders as "N/A".

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use market_analysis::{extract_asset_id, AnalysisRecord, AssetId, SocialImpact};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Asset shown on the dashboard panel
const DASHBOARD_ASSET: &str = "bitcoin";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: String,
    pub source_healthy: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Upper-cased asset id, for display
    pub coin: String,
    pub analysis: AnalysisRecord,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub coin: String,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub coin: String,
    pub analysis: AnalysisRecord,
    pub social_impact: SocialImpact,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn display_coin(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source_healthy = state.analyzer.source_healthy().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        source: state.analyzer.source_name().to_string(),
        source_healthy,
    })
}

/// Full analysis for one asset
pub async fn analysis(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Json<AnalysisRecord> {
    Json(state.analyzer.analyze_str(&coin).await)
}

/// Social reach for one asset
pub async fn social_impact(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Json<SocialImpact> {
    let impact = match AssetId::parse(&coin) {
        Ok(asset) => state.analyzer.social_impact(&asset).await,
        Err(e) => {
            tracing::warn!("Social impact request rejected: {}", e);
            SocialImpact::default()
        }
    };
    Json(impact)
}

/// Current USD price for one asset
pub async fn price(State(state): State<AppState>, Path(coin): Path<String>) -> Json<PriceResponse> {
    let price = match AssetId::parse(&coin) {
        Ok(asset) => state.analyzer.price(&asset).await,
        Err(_) => None,
    };

    Json(PriceResponse {
        coin: display_coin(&coin),
        price,
    })
}

/// Analysis for the asset named in a chat message
pub async fn analyze_message(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty".into(),
                code: "EMPTY_MESSAGE".into(),
            }),
        ));
    }

    let asset = extract_asset_id(&payload.message);
    tracing::debug!("Analyzing {} for chat message", asset);

    let analysis = state.analyzer.analyze(&asset).await;
    let summary = analysis.summary();

    Ok(Json(AnalyzeResponse {
        coin: display_coin(asset.as_str()),
        analysis,
        summary,
    }))
}

/// Default dashboard panel
pub async fn market_data(State(state): State<AppState>) -> Json<DashboardResponse> {
    let analysis = state.analyzer.analyze_str(DASHBOARD_ASSET).await;
    let social_impact = match &analysis.asset {
        Some(asset) => state.analyzer.social_impact(asset).await,
        None => SocialImpact::default(),
    };

    Json(DashboardResponse {
        coin: display_coin(DASHBOARD_ASSET),
        analysis,
        social_impact,
    })
}
