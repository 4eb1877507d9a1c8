use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{AdapterError, AdapterFuture, CapabilitySet, ProviderAdapter};
use crate::{round2, HistoricalSeries, Period, PriceQuote, ProviderId};

const EXCHANGE_RATES_URL: &str = "https://api.coinbase.com/v2/exchange-rates?currency=USD";

/// Exchange-rate adapter. Coinbase quotes XAU as ounces-per-dollar, so the
/// dollar price per ounce is the reciprocal of the published rate. No
/// session history is available, so this adapter never produces change data.
pub struct CoinbaseRateAdapter {
    http_client: Arc<dyn HttpClient>,
}

impl CoinbaseRateAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

impl ProviderAdapter for CoinbaseRateAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Coinbase
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::current_only()
    }

    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote> {
        Box::pin(async move {
            let request = HttpRequest::get(EXCHANGE_RATES_URL);
            let response = self.http_client.execute(request).await?;
            if !response.is_success() {
                return Err(AdapterError::http_status(response.status));
            }

            let rates: RatesResponse = serde_json::from_str(&response.body)
                .map_err(|e| AdapterError::parse(format!("coinbase rates body: {e}")))?;

            let raw = rates
                .data
                .rates
                .get("XAU")
                .ok_or_else(|| AdapterError::no_data("coinbase rates carried no XAU entry"))?;
            let rate: f64 = raw
                .parse()
                .map_err(|_| AdapterError::parse(format!("coinbase XAU rate '{raw}'")))?;
            if !(rate.is_finite() && rate > 0.0) {
                return Err(AdapterError::no_data(format!(
                    "coinbase XAU rate '{raw}' is not a positive number"
                )));
            }

            Ok(PriceQuote::authoritative(
                round2(1.0 / rate),
                None,
                None,
                self.id().display_name(),
            ))
        })
    }

    fn fetch_historical<'a>(&'a self, _period: Period) -> AdapterFuture<'a, HistoricalSeries> {
        Box::pin(async move {
            Err(AdapterError::no_data(
                "coinbase exposes no historical XAU series",
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: RatesData,
}

#[derive(Debug, Deserialize)]
struct RatesData {
    rates: HashMap<String, String>,
}
