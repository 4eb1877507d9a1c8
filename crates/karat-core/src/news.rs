//! Curated market headlines served when no live news feed is reachable.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::domain::rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsImpact {
    pub level: ImpactLevel,
    pub direction: ImpactDirection,
    pub confidence: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub date: String,
    pub impact: NewsImpact,
}

struct FallbackHeadline {
    title: &'static str,
    hours_ago: i64,
    level: ImpactLevel,
    direction: ImpactDirection,
    confidence: f64,
    summary: &'static str,
}

const FALLBACK_HEADLINES: [FallbackHeadline; 5] = [
    FallbackHeadline {
        title: "Gold Holds Steady as Markets Await Fed Decision",
        hours_ago: 0,
        level: ImpactLevel::Medium,
        direction: ImpactDirection::Neutral,
        confidence: 0.7,
        summary: "Markets await Federal Reserve decision on interest rates, impacting gold prices.",
    },
    FallbackHeadline {
        title: "Rising Inflation Concerns Boost Gold Appeal",
        hours_ago: 2,
        level: ImpactLevel::High,
        direction: ImpactDirection::Bullish,
        confidence: 0.8,
        summary: "Increasing inflation concerns drive investors towards gold as a safe haven.",
    },
    FallbackHeadline {
        title: "Technical Analysis: Gold Forms Bullish Pattern",
        hours_ago: 4,
        level: ImpactLevel::Medium,
        direction: ImpactDirection::Bullish,
        confidence: 0.6,
        summary: "Technical indicators suggest potential upward movement in gold prices.",
    },
    FallbackHeadline {
        title: "USD Weakness Supports Gold Prices",
        hours_ago: 6,
        level: ImpactLevel::High,
        direction: ImpactDirection::Bullish,
        confidence: 0.75,
        summary: "Weakening US dollar provides support for gold as an alternative asset.",
    },
    FallbackHeadline {
        title: "Central Bank Gold Purchases Increase in Q1",
        hours_ago: 8,
        level: ImpactLevel::High,
        direction: ImpactDirection::Bullish,
        confidence: 0.85,
        summary: "Global central banks increased gold reserves in the first quarter, \
                  indicating strong institutional demand.",
    },
];

/// Headlines dated backwards from `now` at two-hour steps.
pub fn fallback_news(now: OffsetDateTime) -> Vec<NewsItem> {
    FALLBACK_HEADLINES
        .iter()
        .map(|headline| NewsItem {
            title: String::from(headline.title),
            link: String::from("#"),
            date: rfc3339(now - Duration::hours(headline.hours_ago)),
            impact: NewsImpact {
                level: headline.level,
                direction: headline.direction,
                confidence: headline.confidence,
                summary: String::from(headline.summary),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn fallback_news_is_five_items_newest_first() {
        let news = fallback_news(datetime!(2024-03-15 12:00 UTC));

        assert_eq!(news.len(), 5);
        assert_eq!(news[0].date, "2024-03-15T12:00:00Z");
        assert_eq!(news[4].date, "2024-03-15T04:00:00Z");
        assert_eq!(news[0].impact.direction, ImpactDirection::Neutral);
    }

    #[test]
    fn impact_levels_serialize_lowercase() {
        let news = fallback_news(datetime!(2024-03-15 12:00 UTC));
        let json = serde_json::to_value(&news[1]).expect("item serializes");

        assert_eq!(json["impact"]["level"], serde_json::json!("high"));
        assert_eq!(json["impact"]["direction"], serde_json::json!("bullish"));
    }
}
