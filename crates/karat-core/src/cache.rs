//! Freshness-window cache keyed by logical resource.
//!
//! One entry per resource key, overwritten whole on every successful fetch.
//! Staleness is judged at read time against the injected clock, so tests can
//! step time instead of sleeping.

use std::collections::HashMap;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::{HistoricalSeries, MarketStats, Period, PriceQuote};

/// Logical resource a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    CurrentPrice,
    Historical(Period),
    MarketStats,
}

impl ResourceKey {
    pub fn as_str(&self) -> String {
        match self {
            ResourceKey::CurrentPrice => String::from("current_price"),
            ResourceKey::Historical(period) => format!("historical:{}", period.as_str()),
            ResourceKey::MarketStats => String::from("market_stats"),
        }
    }

    /// How long an entry under this key stays fresh.
    pub fn window(&self) -> Duration {
        match self {
            ResourceKey::CurrentPrice | ResourceKey::MarketStats => Duration::seconds(60),
            ResourceKey::Historical(_) => Duration::seconds(300),
        }
    }
}

/// Payload stored under a resource key.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Quote(PriceQuote),
    Series(HistoricalSeries),
    Stats(MarketStats),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    stored_at: OffsetDateTime,
}

/// Shared in-process cache. Cheap to clone; clones share the same map.
#[derive(Clone)]
pub struct CacheStore {
    entries: Arc<RwLock<HashMap<ResourceKey, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the entry for `key` if it is still inside its freshness
    /// window. Stale entries are treated as absent but not evicted; the
    /// next `put` overwrites them.
    pub async fn get(&self, key: ResourceKey) -> Option<CachedValue> {
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        let age = self.clock.now() - entry.stored_at;
        if age < key.window() {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn put(&self, key: ResourceKey, value: CachedValue) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    pub async fn get_quote(&self, key: ResourceKey) -> Option<PriceQuote> {
        match self.get(key).await {
            Some(CachedValue::Quote(quote)) => Some(quote),
            _ => None,
        }
    }

    pub async fn get_series(&self, key: ResourceKey) -> Option<HistoricalSeries> {
        match self.get(key).await {
            Some(CachedValue::Series(series)) => Some(series),
            _ => None,
        }
    }

    pub async fn get_stats(&self, key: ResourceKey) -> Option<MarketStats> {
        match self.get(key).await {
            Some(CachedValue::Stats(stats)) => Some(stats),
            _ => None,
        }
    }
}
