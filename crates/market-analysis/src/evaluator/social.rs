//! Community sentiment scoring
//!
//! Missing counts are treated as zero.

use crate::model::{CommunityTier, SocialMetrics, SocialSentiment};

pub const HIGH_ENGAGEMENT_SIGNAL: &str = "High community engagement detected";

/// Twitter + Reddit + Telegram audience size
pub fn total_followers(metrics: &SocialMetrics) -> u64 {
    [
        metrics.twitter_followers,
        metrics.reddit_subscribers,
        metrics.telegram_user_count,
    ]
    .into_iter()
    .flatten()
    .fold(0, u64::saturating_add)
}

/// Strength tier and score contribution of the audience size
fn community_strength(followers: u64) -> (CommunityTier, u8) {
    match followers {
        f if f > 1_000_000 => (CommunityTier::VeryHigh, 3),
        f if f > 100_000 => (CommunityTier::High, 2),
        f if f > 10_000 => (CommunityTier::Medium, 1),
        _ => (CommunityTier::Low, 0),
    }
}

/// Engagement tier and score contribution of 48h active Reddit accounts
fn engagement_level(active_accounts: u64) -> (CommunityTier, u8) {
    match active_accounts {
        a if a > 1000 => (CommunityTier::VeryHigh, 3),
        a if a > 100 => (CommunityTier::High, 2),
        _ => (CommunityTier::Low, 0),
    }
}

pub fn social_sentiment(metrics: &SocialMetrics) -> SocialSentiment {
    let (community_strength, strength_score) = community_strength(total_followers(metrics));
    let (engagement_level, engagement_score) =
        engagement_level(metrics.reddit_active_accounts.unwrap_or(0));

    let mut potential_signals = Vec::new();
    if engagement_level == CommunityTier::VeryHigh {
        potential_signals.push(HIGH_ENGAGEMENT_SIGNAL.to_string());
    }

    SocialSentiment {
        overall_score: strength_score + engagement_score,
        community_strength,
        engagement_level,
        potential_signals,
    }
}
