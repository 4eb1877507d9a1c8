use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::Period;

/// Round to 2 fractional digits. Applied at the point of normalization, so
/// derived fields (change, change_percent) are computed from already-rounded
/// prices.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

/// Current-price result served to the frontend.
///
/// `change`/`change_percent` are present only when a prior-period comparison
/// was available; absent is distinct from zero and is never serialized as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    /// Instant of computation, not of the underlying market data.
    pub timestamp: String,
    pub source: String,
    pub authoritative: bool,
}

impl PriceQuote {
    /// Quote backed by a real provider response.
    pub fn authoritative(
        price: f64,
        change: Option<f64>,
        change_percent: Option<f64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            price,
            change,
            change_percent,
            timestamp: rfc3339(OffsetDateTime::now_utc()),
            source: source.into(),
            authoritative: true,
        }
    }

    pub fn fallback(price: f64, source: impl Into<String>) -> Self {
        Self {
            price,
            change: None,
            change_percent: None,
            timestamp: rfc3339(OffsetDateTime::now_utc()),
            source: source.into(),
            authoritative: false,
        }
    }
}

/// One observation in a historical series. `date` is a calendar day
/// (`YYYY-MM-DD`), or day plus hour for the 1D period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PricePoint {
    pub fn close_only(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }
}

/// Ordered historical series for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub prices: Vec<PricePoint>,
    pub period: Period,
    pub source: String,
    pub authoritative: bool,
}

impl HistoricalSeries {
    /// Build a series from provider points: sorted ascending by date and
    /// deduplicated by date, keeping the last write. Never padded.
    pub fn new(
        points: Vec<PricePoint>,
        period: Period,
        source: impl Into<String>,
        authoritative: bool,
    ) -> Self {
        let mut prices = points;
        // Stable sort keeps the provider's ordering for equal dates, so the
        // later record wins the dedup below.
        prices.sort_by(|a, b| a.date.cmp(&b.date));
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(prices.len());
        for point in prices {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            prices: deduped,
            period,
            source: source.into(),
            authoritative,
        }
    }

    /// Keep only the `max` most recent points.
    pub fn truncate_to_recent(&mut self, max: usize) {
        if self.prices.len() > max {
            self.prices.drain(..self.prices.len() - max);
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|point| point.price).collect()
    }
}

/// Inclusive low/high pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: round2(low),
            high: round2(high),
        }
    }

    /// Range spanning the High/Low columns of a series, falling back to the
    /// close when a point carries no high/low.
    pub fn of_series(series: &HistoricalSeries) -> Option<Self> {
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for point in &series.prices {
            low = low.min(point.low.unwrap_or(point.price));
            high = high.max(point.high.unwrap_or(point.price));
        }
        if low.is_finite() && high.is_finite() {
            Some(Self::new(low, high))
        } else {
            None
        }
    }
}

/// Derived market statistics. `day_range` is computed as ±0.5% of the
/// current price; week/year ranges come from the historical provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub day_range: PriceRange,
    pub week_range: PriceRange,
    pub year_range: PriceRange,
    pub current_price: f64,
    pub source: String,
    pub authoritative: bool,
}
