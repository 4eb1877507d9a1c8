use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{AdapterError, AdapterFuture, CapabilitySet, ProviderAdapter};
use crate::{round2, HistoricalSeries, Period, PriceQuote, ProviderId};

const EXCHANGE_RATE_URL: &str = "https://www.alphavantage.co/query\
?function=CURRENCY_EXCHANGE_RATE&from_currency=XAU&to_currency=USD";

/// Alpha Vantage XAU→USD adapter. Key-gated on `ALPHA_VANTAGE_API_KEY`;
/// current price only, no change data.
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
        }
    }
}

impl ProviderAdapter for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::AlphaVantage
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::current_only()
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote> {
        Box::pin(async move {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AdapterError::no_data("alpha vantage adapter is not configured"))?;
            let url = format!("{EXCHANGE_RATE_URL}&apikey={}", urlencoding::encode(key));

            let response = self.http_client.execute(HttpRequest::get(url)).await?;
            if !response.is_success() {
                return Err(AdapterError::http_status(response.status));
            }

            let body: ExchangeRateResponse = serde_json::from_str(&response.body)
                .map_err(|e| AdapterError::parse(format!("alpha vantage body: {e}")))?;

            let rate = body
                .exchange_rate
                .ok_or_else(|| AdapterError::no_data("alpha vantage carried no exchange rate"))?;
            let price: f64 = rate
                .exchange_rate
                .parse()
                .map_err(|_| AdapterError::parse(format!("alpha vantage rate '{}'", rate.exchange_rate)))?;

            Ok(PriceQuote::authoritative(
                round2(price),
                None,
                None,
                self.id().display_name(),
            ))
        })
    }

    fn fetch_historical<'a>(&'a self, _period: Period) -> AdapterFuture<'a, HistoricalSeries> {
        Box::pin(async move {
            Err(AdapterError::no_data(
                "alpha vantage adapter serves current price only",
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate", default)]
    exchange_rate: Option<ExchangeRate>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: String,
}
