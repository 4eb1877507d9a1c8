//! Chain ordering, short-circuit and last-resort fallback semantics.

use std::sync::{Arc, Mutex};

use time::macros::datetime;

use karat_core::provider::AdapterFuture;
use karat_core::{
    AdapterError, CapabilitySet, FallbackChain, GoldPriceService, HistoricalSeries, ManualClock,
    Period, PriceQuote, ProviderAdapter, ProviderId, FALLBACK_CURRENT_PRICE, FALLBACK_SOURCE,
    SYNTHETIC_SOURCE,
};

/// Scripted adapter that records every invocation into a shared log.
struct ScriptedAdapter {
    id: ProviderId,
    enabled: bool,
    outcome: Result<f64, &'static str>,
    log: Arc<Mutex<Vec<ProviderId>>>,
}

impl ScriptedAdapter {
    fn succeeding(id: ProviderId, price: f64, log: &Arc<Mutex<Vec<ProviderId>>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            enabled: true,
            outcome: Ok(price),
            log: log.clone(),
        })
    }

    fn failing(id: ProviderId, message: &'static str, log: &Arc<Mutex<Vec<ProviderId>>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            enabled: true,
            outcome: Err(message),
            log: log.clone(),
        })
    }

    fn disabled(id: ProviderId, log: &Arc<Mutex<Vec<ProviderId>>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            enabled: false,
            outcome: Err("never invoked"),
            log: log.clone(),
        })
    }

    fn record(&self) {
        self.log.lock().unwrap().push(self.id);
    }
}

impl ProviderAdapter for ScriptedAdapter {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote> {
        Box::pin(async move {
            self.record();
            match self.outcome {
                Ok(price) => Ok(PriceQuote::authoritative(price, None, None, self.id.display_name())),
                Err(message) => Err(AdapterError::no_data(message)),
            }
        })
    }

    fn fetch_historical<'a>(&'a self, period: Period) -> AdapterFuture<'a, HistoricalSeries> {
        Box::pin(async move {
            self.record();
            match self.outcome {
                Ok(price) => Ok(HistoricalSeries::new(
                    vec![karat_core::PricePoint::close_only("2024-03-15", price)],
                    period,
                    self.id.display_name(),
                    true,
                )),
                Err(message) => Err(AdapterError::no_data(message)),
            }
        })
    }
}

#[tokio::test]
async fn first_success_wins_and_later_adapters_are_not_contacted() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = FallbackChain::new(vec![
        ScriptedAdapter::failing(ProviderId::YahooFutures, "down", &log),
        ScriptedAdapter::succeeding(ProviderId::Coinbase, 3448.28, &log),
        ScriptedAdapter::succeeding(ProviderId::Fcs, 9999.0, &log),
    ]);

    let quote = chain.fetch_current().await.expect("second adapter succeeds");

    assert_eq!(quote.price, 3448.28);
    assert_eq!(quote.source, "Coinbase");
    assert_eq!(
        *log.lock().unwrap(),
        vec![ProviderId::YahooFutures, ProviderId::Coinbase]
    );
}

#[tokio::test]
async fn disabled_adapters_are_skipped_without_an_attempt() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = FallbackChain::new(vec![
        ScriptedAdapter::disabled(ProviderId::Fcs, &log),
        ScriptedAdapter::succeeding(ProviderId::AlphaVantage, 3402.13, &log),
    ]);

    let quote = chain.fetch_current().await.expect("enabled adapter succeeds");

    assert_eq!(quote.price, 3402.13);
    assert_eq!(*log.lock().unwrap(), vec![ProviderId::AlphaVantage]);
}

#[tokio::test]
async fn exhausted_chain_reports_every_attempt() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = FallbackChain::new(vec![
        ScriptedAdapter::failing(ProviderId::YahooFutures, "down", &log),
        ScriptedAdapter::failing(ProviderId::Coinbase, "also down", &log),
    ]);

    let error = chain.fetch_current().await.expect_err("everything fails");

    assert_eq!(error.attempts.len(), 2);
    assert_eq!(error.attempts[0].0, ProviderId::YahooFutures);
    assert_eq!(error.attempts[1].0, ProviderId::Coinbase);
}

#[tokio::test]
async fn current_price_falls_back_to_the_fixed_literal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let clock = Arc::new(ManualClock::new(datetime!(2024-03-15 12:00 UTC)));
    let chain = FallbackChain::new(vec![ScriptedAdapter::failing(
        ProviderId::YahooFutures,
        "down",
        &log,
    )]);
    let service = GoldPriceService::new(chain, clock);

    let quote = service.current_price().await;

    assert_eq!(quote.price, FALLBACK_CURRENT_PRICE);
    assert_eq!(quote.source, FALLBACK_SOURCE);
    assert!(!quote.authoritative);
    assert_eq!(quote.change, None);
    assert_eq!(quote.change_percent, None);
}

#[tokio::test]
async fn historical_falls_back_to_the_synthetic_generator() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let clock = Arc::new(ManualClock::new(datetime!(2024-03-15 12:00 UTC)));
    let chain = FallbackChain::new(vec![ScriptedAdapter::failing(
        ProviderId::YahooFutures,
        "down",
        &log,
    )]);
    let service = GoldPriceService::new(chain, clock);

    let series = service.historical(Some("1W")).await;

    assert_eq!(series.source, SYNTHETIC_SOURCE);
    assert!(!series.authoritative);
    assert_eq!(series.prices.len(), 7);
}

#[tokio::test]
async fn stats_over_a_dead_chain_stay_internally_consistent() {
    let clock = Arc::new(ManualClock::new(datetime!(2024-03-15 12:00 UTC)));
    let service = GoldPriceService::new(FallbackChain::new(Vec::new()), clock);

    let stats = service.market_stats().await;

    assert!(!stats.authoritative);
    assert_eq!(stats.current_price, FALLBACK_CURRENT_PRICE);
    assert!(stats.week_range.low <= stats.week_range.high);
    assert!(stats.year_range.low <= stats.year_range.high);
}
