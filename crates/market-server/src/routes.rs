//! Router

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{analysis, analyze_message, health_check, market_data, price, social_impact};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))

        // Analysis API
        .route("/api/analysis/{coin}", get(analysis))
        .route("/api/social/{coin}", get(social_impact))
        .route("/api/price/{coin}", get(price))
        .route("/api/analyze", post(analyze_message))
        .route("/api/market-data", get(market_data))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use market_analysis::{MarketAnalyzer, MockMarketSource};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn app() -> (Arc<MockMarketSource>, Router) {
        let source = Arc::new(MockMarketSource::new());
        let analyzer = MarketAnalyzer::new(source.clone());
        (source, router(AppState::new(analyzer)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let (status, body) = send(app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["source"], "MockMarket");
        assert_eq!(body["source_healthy"], true);
    }

    #[tokio::test]
    async fn test_analysis_endpoint() {
        let (_, app) = app();
        let (status, body) = send(app, get("/api/analysis/Bitcoin")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["asset"], "bitcoin");
        assert_eq!(body["risk_analysis"]["risk_level"], "Low");
        assert_eq!(body["market_metrics"]["market_cap_rank"], 1);
        assert!(body["trading_signals"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_coin_is_not_an_http_error() {
        let (_, app) = app();
        let (status, body) = send(app, get("/api/analysis/nonexistent")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_analysis"]["risk_level"], "Unknown");
        assert!(body["risk_analysis"]["volatility_24h"].is_null());
        assert!(body["price_data"]["current_price"].is_null());
        assert_eq!(body["trading_signals"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_social_and_price_endpoints() {
        let (source, app) = app();

        let (_, social) = send(app.clone(), get("/api/social/bitcoin")).await;
        assert_eq!(social["social_metrics"]["twitter_followers"], 6500000);
        assert_eq!(social["public_interest"], 9440);
        assert_eq!(social["sentiment"]["community_strength"], "very high");
        assert_eq!(social["sentiment"]["overall_score"], 6);
        assert_eq!(
            social["sentiment"]["potential_signals"],
            serde_json::json!(["High community engagement detected"])
        );

        let (_, price) = send(app, get("/api/price/bitcoin")).await;
        assert_eq!(price["coin"], "BITCOIN");
        assert!(!price["price"].is_null());

        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_message() {
        let (_, app) = app();
        let request = post_json(
            "/api/analyze",
            &serde_json::json!({"message": "Can you analyze dogecoin today?"}),
        );
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coin"], "DOGECOIN");
        assert_eq!(
            body["analysis"]["trading_signals"],
            serde_json::json!([
                "High volatility detected: 12.0% price change in 24h",
                "Significant volume decrease: -52.0% in 24h"
            ])
        );
        assert!(body["summary"].as_str().unwrap().contains("Market Analysis: DOGECOIN"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_message() {
        let (_, app) = app();
        let request = post_json("/api/analyze", &serde_json::json!({"message": "  "}));
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_MESSAGE");
    }

    #[tokio::test]
    async fn test_dashboard_defaults_to_bitcoin() {
        let (_, app) = app();
        let (status, body) = send(app, get("/api/market-data")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coin"], "BITCOIN");
        assert_eq!(body["analysis"]["asset"], "bitcoin");
        assert_eq!(body["social_impact"]["social_metrics"]["reddit_subscribers"], 5900000);
    }
}
