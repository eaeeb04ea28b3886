//! Asset id extraction from free-form chat messages

use std::sync::LazyLock;

use regex::Regex;

use crate::model::AssetId;

/// Asset analyzed when the message names none
pub const DEFAULT_ASSET: &str = "bitcoin";

static ASSET_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:analyze|check|about)\s+(\w+)").expect("asset request pattern is valid")
});

/// Find the asset in phrases like "analyze DOGE" or "what about solana?".
///
/// Falls back to [`DEFAULT_ASSET`] when nothing usable follows the keyword.
pub fn extract_asset_id(message: &str) -> AssetId {
    ASSET_REQUEST
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| AssetId::parse(m.as_str()).ok())
        .unwrap_or_else(default_asset)
}

fn default_asset() -> AssetId {
    AssetId(DEFAULT_ASSET.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_after_keyword() {
        assert_eq!(extract_asset_id("Please analyze DOGE coin").as_str(), "doge");
        assert_eq!(extract_asset_id("can you check ethereum for me").as_str(), "ethereum");
        assert_eq!(extract_asset_id("What about Solana?").as_str(), "solana");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_asset_id("check cardano, then analyze polkadot").as_str(), "cardano");
    }

    #[test]
    fn test_defaults_to_bitcoin() {
        assert_eq!(extract_asset_id("how is the market today?").as_str(), DEFAULT_ASSET);
        assert_eq!(extract_asset_id("").as_str(), DEFAULT_ASSET);
        assert_eq!(extract_asset_id("analyze").as_str(), DEFAULT_ASSET);
    }
}
