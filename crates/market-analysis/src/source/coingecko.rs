//! CoinGecko Client
//!
//! Fetches the coin detail endpoint and flattens its nested `market_data`,
//! `community_data` and `public_interest_stats` objects into a `MarketSnapshot`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument, warn};

use super::MarketDataSource;
use crate::error::{FetchError, Result};
use crate::model::{AssetId, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const COIN_DETAIL_QUERY: [(&str, &str); 6] = [
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "true"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

/// CoinGecko client configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Demo API key, sent as `x-cg-demo-api-key`
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = var("COINGECKO_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_key = var("COINGECKO_API_KEY").filter(|k| !k.is_empty());
        let timeout = var("COINGECKO_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        Self {
            base_url,
            api_key,
            timeout,
        }
    }
}

/// HTTP client for the public CoinGecko API
pub struct CoinGeckoClient {
    client: Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("market-analysis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(CoinGeckoConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}{}", self.config.base_url, path));
        match &self.config.api_key {
            Some(key) => request.header("x-cg-demo-api-key", key),
            None => request,
        }
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    #[instrument(skip(self, asset), fields(asset = %asset))]
    async fn fetch(&self, asset: &AssetId) -> Result<MarketSnapshot> {
        let response = self
            .get(&format!("/coins/{asset}"))
            .query(&COIN_DETAIL_QUERY)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(asset.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            warn!("CoinGecko request failed with status: {}", status);
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        debug!("Response body length: {} bytes", body.len());

        let detail: CoinDetail = serde_json::from_str(&body)?;
        if let Some(error) = detail.error {
            debug!("CoinGecko reported error: {}", error);
            return Err(FetchError::NotFound(asset.to_string()));
        }

        Ok(detail.into_snapshot())
    }

    async fn health_check(&self) -> bool {
        match self.get("/ping").send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("CoinGecko ping failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// `/coins/{id}` response body, only the parts we read
#[derive(Debug, Default, Deserialize)]
struct CoinDetail {
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    market_cap_rank: Option<Decimal>,
    market_data: Option<WireMarketData>,
    community_data: Option<WireCommunityData>,
    public_interest_stats: Option<WirePublicInterest>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    coingecko_score: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    community_score: Option<Decimal>,
}

/// Per-currency quote map; only USD is used
#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default, deserialize_with = "lenient_decimal")]
    usd: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct WireMarketData {
    current_price: Option<Quote>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    price_change_percentage_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    price_change_percentage_7d: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    price_change_percentage_30d: Option<Decimal>,
    ath: Option<Quote>,
    ath_change_percentage: Option<Quote>,
    market_cap: Option<Quote>,
    total_volume: Option<Quote>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    circulating_supply: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    total_supply: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    volume_change_24h: Option<Decimal>,
}

// Counts are read as decimals: the API occasionally sends them as floats.
#[derive(Debug, Default, Deserialize)]
struct WireCommunityData {
    #[serde(default, deserialize_with = "lenient_decimal")]
    twitter_followers: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    reddit_subscribers: Option<Decimal>,
    #[serde(
        default,
        alias = "reddit_accounts_active_48h",
        deserialize_with = "lenient_decimal"
    )]
    reddit_active_accounts: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    telegram_channel_user_count: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePublicInterest {
    #[serde(default, deserialize_with = "lenient_decimal")]
    alexa_rank: Option<Decimal>,
}

/// Numeric field that degrades to `None` when it is not a number `Decimal`
/// can hold (e.g. a `1e30` supply), so one odd field never fails the body.
fn lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn usd(quote: Option<Quote>) -> Option<Decimal> {
    quote.and_then(|q| q.usd)
}

fn count(value: Option<Decimal>) -> Option<u64> {
    value.and_then(|v| v.trunc().to_u64())
}

impl CoinDetail {
    fn into_snapshot(self) -> MarketSnapshot {
        let market = self.market_data.unwrap_or_default();
        let community = self.community_data.unwrap_or_default();
        let interest = self.public_interest_stats.unwrap_or_default();

        MarketSnapshot {
            current_price: usd(market.current_price),
            price_change_pct_24h: market.price_change_percentage_24h,
            price_change_pct_7d: market.price_change_percentage_7d,
            price_change_pct_30d: market.price_change_percentage_30d,
            all_time_high: usd(market.ath),
            all_time_high_change_pct: usd(market.ath_change_percentage),
            market_cap: usd(market.market_cap),
            market_cap_rank: self
                .market_cap_rank
                .and_then(|r| r.trunc().to_u32())
                .filter(|r| *r >= 1),
            total_volume: usd(market.total_volume),
            circulating_supply: market.circulating_supply,
            total_supply: market.total_supply,
            volume_change_pct_24h: market.volume_change_24h,
            twitter_followers: count(community.twitter_followers),
            reddit_subscribers: count(community.reddit_subscribers),
            reddit_active_accounts: count(community.reddit_active_accounts),
            telegram_user_count: count(community.telegram_channel_user_count),
            coingecko_score: self.coingecko_score,
            community_score: self.community_score,
            alexa_rank: count(interest.alexa_rank),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BITCOIN_BODY: &str = r#"{
        "id": "bitcoin",
        "symbol": "btc",
        "market_cap_rank": 1,
        "coingecko_score": 83.151,
        "community_score": 71.4,
        "market_data": {
            "current_price": {"usd": 97500.5, "eur": 90100},
            "price_change_percentage_24h": -2.35,
            "price_change_percentage_7d": 4.1,
            "price_change_percentage_30d": null,
            "ath": {"usd": 108135},
            "ath_change_percentage": {"usd": -9.8},
            "market_cap": {"usd": 1930000000000},
            "total_volume": {"usd": 45000000000},
            "circulating_supply": 19800000.0,
            "total_supply": 21000000.0
        },
        "community_data": {
            "twitter_followers": 6500000,
            "reddit_subscribers": 5900000,
            "reddit_accounts_active_48h": 4021.0,
            "telegram_channel_user_count": null
        },
        "public_interest_stats": {"alexa_rank": 9440}
    }"#;

    async fn client_for(server: &MockServer) -> CoinGeckoClient {
        CoinGeckoClient::new(CoinGeckoConfig {
            base_url: server.uri(),
            api_key: None,
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    fn bitcoin() -> AssetId {
        AssetId::parse("bitcoin").unwrap()
    }

    #[test]
    fn test_detail_flattening() {
        let detail: CoinDetail = serde_json::from_str(BITCOIN_BODY).unwrap();
        let snapshot = detail.into_snapshot();

        assert_eq!(snapshot.current_price, Some(dec!(97500.5)));
        assert_eq!(snapshot.price_change_pct_24h, Some(dec!(-2.35)));
        assert_eq!(snapshot.price_change_pct_30d, None);
        assert_eq!(snapshot.all_time_high_change_pct, Some(dec!(-9.8)));
        assert_eq!(snapshot.market_cap, Some(dec!(1930000000000)));
        assert_eq!(snapshot.market_cap_rank, Some(1));
        assert_eq!(snapshot.reddit_active_accounts, Some(4021));
        assert_eq!(snapshot.telegram_user_count, None);
        assert_eq!(snapshot.alexa_rank, Some(9440));
        assert_eq!(snapshot.volume_change_pct_24h, None);
    }

    #[test]
    fn test_sparse_body_is_all_none() {
        let detail: CoinDetail = serde_json::from_str(r#"{"id": "obscure"}"#).unwrap();
        assert_eq!(detail.into_snapshot(), MarketSnapshot::default());
    }

    #[test]
    fn test_out_of_range_field_is_dropped() {
        let body = r#"{
            "market_data": {
                "current_price": {"usd": 0.0000001},
                "total_supply": 1e30,
                "circulating_supply": 420690000000000.0
            },
            "public_interest_stats": {"alexa_rank": 1e40}
        }"#;
        let snapshot = serde_json::from_str::<CoinDetail>(body).unwrap().into_snapshot();

        assert_eq!(snapshot.current_price, Some(dec!(0.0000001)));
        assert_eq!(snapshot.total_supply, None);
        assert_eq!(snapshot.circulating_supply, Some(dec!(420690000000000)));
        assert_eq!(snapshot.alexa_rank, None);
    }

    #[tokio::test]
    async fn test_fetch_tolerates_unrepresentable_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/pepe"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"market_data": {"current_price": {"usd": 0.00002}, "total_supply": 1e30}}"#,
            ))
            .mount(&server)
            .await;

        let asset = AssetId::parse("pepe").unwrap();
        let snapshot = client_for(&server).await.fetch(&asset).await.unwrap();
        assert_eq!(snapshot.current_price, Some(dec!(0.00002)));
        assert_eq!(snapshot.total_supply, None);
    }

    #[test]
    fn test_config_from_vars() {
        let config = CoinGeckoConfig::from_vars(|key| match key {
            "COINGECKO_API_URL" => Some("http://localhost:9000/api/v3/".into()),
            "COINGECKO_TIMEOUT_SECS" => Some("5".into()),
            "COINGECKO_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:9000/api/v3");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.api_key.is_none());

        let defaults = CoinGeckoConfig::from_vars(|_| None);
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .and(query_param("market_data", "true"))
            .and(query_param("community_data", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BITCOIN_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server).await.fetch(&bitcoin()).await.unwrap();
        assert_eq!(snapshot.current_price, Some(dec!(97500.5)));
        assert_eq!(snapshot.twitter_followers, Some(6_500_000));
    }

    #[tokio::test]
    async fn test_fetch_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .and(header("x-cg-demo-api-key", "demo-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BITCOIN_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = CoinGeckoClient::new(CoinGeckoConfig {
            base_url: server.uri(),
            api_key: Some("demo-key".into()),
            timeout: Duration::from_millis(500),
        })
        .unwrap();
        assert!(client.fetch(&bitcoin()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/nonexistent"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"coin not found"}"#),
            )
            .mount(&server)
            .await;

        let asset = AssetId::parse("nonexistent").unwrap();
        let result = client_for(&server).await.fetch(&asset).await;
        assert!(matches!(result, Err(FetchError::NotFound(id)) if id == "nonexistent"));
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&bitcoin()).await;
        assert!(matches!(result, Err(FetchError::Status { status: 503 })));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&bitcoin()).await;
        assert!(matches!(result, Err(FetchError::RateLimited)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&bitcoin()).await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(BITCOIN_BODY)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&bitcoin()).await;
        assert!(matches!(result, Err(FetchError::Transport(e)) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"gecko_says":"(V3) To the Moon!"}"#))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.health_check().await);
    }
}
