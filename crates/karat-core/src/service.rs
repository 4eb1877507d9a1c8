//! Orchestration layer behind the HTTP handlers.
//!
//! Every operation resolves in this order: fresh cache entry, then the
//! provider chain, then a deterministic fallback. The fallback path marks
//! its output `authoritative: false`; callers never see an error.

use std::sync::Arc;

use tracing::warn;

use crate::cache::{CacheStore, CachedValue, ResourceKey};
use crate::chain::{ChainBuilder, FallbackChain};
use crate::clock::{Clock, SystemClock};
use crate::source::FALLBACK_SOURCE;
use crate::synthetic::SyntheticGenerator;
use crate::{HistoricalSeries, MarketStats, Period, PriceQuote, PriceRange};

/// Last-resort current price when every provider fails.
pub const FALLBACK_CURRENT_PRICE: f64 = 3405.00;

/// Provider data is trimmed to this many most-recent points unless the
/// resolved period itself asks for a longer window.
const RECENT_POINT_CAP: usize = 30;

pub struct GoldPriceService {
    chain: FallbackChain,
    cache: CacheStore,
    synthetic: SyntheticGenerator,
}

impl GoldPriceService {
    pub fn new(chain: FallbackChain, clock: Arc<dyn Clock>) -> Self {
        Self {
            chain,
            cache: CacheStore::new(clock.clone()),
            synthetic: SyntheticGenerator::new(clock),
        }
    }

    /// Production wiring: reqwest transport, wall clock, API keys from the
    /// environment.
    pub fn from_env() -> Self {
        Self::new(ChainBuilder::from_env().build(), Arc::new(SystemClock))
    }

    /// Current spot price. Never fails; an exhausted chain yields the
    /// literal fallback quote.
    pub async fn current_price(&self) -> PriceQuote {
        if let Some(quote) = self.cache.get_quote(ResourceKey::CurrentPrice).await {
            return quote;
        }

        let quote = match self.chain.fetch_current().await {
            Ok(quote) => quote,
            Err(error) => {
                warn!(%error, "serving fallback current price");
                PriceQuote::fallback(FALLBACK_CURRENT_PRICE, FALLBACK_SOURCE)
            }
        };

        self.cache
            .put(ResourceKey::CurrentPrice, CachedValue::Quote(quote.clone()))
            .await;
        quote
    }

    /// Historical series for an optional period parameter. Missing or
    /// unrecognized periods resolve to 1M; a provider over-delivering for a
    /// window of 30 points or fewer is trimmed to the most recent points,
    /// so `period=XX` and `period=1M` answer identically.
    pub async fn historical(&self, period_param: Option<&str>) -> HistoricalSeries {
        let period = Period::resolve(period_param);
        let mut series = self.historical_series(period).await;
        if period.point_count() <= RECENT_POINT_CAP {
            series.truncate_to_recent(RECENT_POINT_CAP);
        }
        series
    }

    async fn historical_series(&self, period: Period) -> HistoricalSeries {
        let key = ResourceKey::Historical(period);
        if let Some(series) = self.cache.get_series(key).await {
            return series;
        }

        let series = match self.chain.fetch_historical(period).await {
            Ok(series) => series,
            Err(error) => {
                warn!(%error, %period, "serving synthetic historical series");
                self.synthetic.generate(period)
            }
        };

        self.cache
            .put(key, CachedValue::Series(series.clone()))
            .await;
        series
    }

    /// Derived ranges around the current price. Authoritative only when the
    /// current price and both feeding series are; the source label names
    /// every distinct contributor so partially synthetic ranges are never
    /// attributed to a live provider alone.
    pub async fn market_stats(&self) -> MarketStats {
        if let Some(stats) = self.cache.get_stats(ResourceKey::MarketStats).await {
            return stats;
        }

        let current = self.current_price().await;
        let week = self.historical_series(Period::OneWeek).await;
        let year = self.historical_series(Period::OneYear).await;

        let day_range = PriceRange::new(current.price * 0.995, current.price * 1.005);
        let week_range = PriceRange::of_series(&week).unwrap_or(day_range);
        let year_range = PriceRange::of_series(&year).unwrap_or(day_range);

        let mut sources = vec![current.source];
        for label in [&week.source, &year.source] {
            if !sources.iter().any(|s| s == label) {
                sources.push(label.clone());
            }
        }

        let stats = MarketStats {
            day_range,
            week_range,
            year_range,
            current_price: current.price,
            source: sources.join(" + "),
            authoritative: current.authoritative && week.authoritative && year.authoritative,
        };

        self.cache
            .put(ResourceKey::MarketStats, CachedValue::Stats(stats.clone()))
            .await;
        stats
    }
}
