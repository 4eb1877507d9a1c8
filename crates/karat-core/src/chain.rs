//! Sequential provider fallback.
//!
//! Adapters are tried in fixed priority order; the first success wins and
//! later adapters are not contacted. A failure is logged and the chain moves
//! on. Only when every adapter has failed does the chain report exhaustion,
//! carrying the per-provider failures for the caller's logs.

use std::env;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapters::{AlphaVantageAdapter, CoinbaseRateAdapter, FcsAdapter, YahooFuturesAdapter};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{AdapterError, ProviderAdapter};
use crate::{HistoricalSeries, Period, PriceQuote, ProviderId};

/// Every adapter in the chain failed (or was skipped).
#[derive(Debug)]
pub struct ChainExhausted {
    pub attempts: Vec<(ProviderId, AdapterError)>,
}

impl Display for ChainExhausted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.attempts.is_empty() {
            return f.write_str("no provider was eligible for this request");
        }
        write!(f, "all {} eligible providers failed", self.attempts.len())
    }
}

impl std::error::Error for ChainExhausted {}

/// Fixed-order provider chain.
pub struct FallbackChain {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl FallbackChain {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.adapters.iter().map(|adapter| adapter.id()).collect()
    }

    pub async fn fetch_current(&self) -> Result<PriceQuote, ChainExhausted> {
        let mut attempts = Vec::new();
        for adapter in &self.adapters {
            if !adapter.enabled() {
                debug!(provider = %adapter.id(), "skipping disabled provider");
                continue;
            }
            if !adapter.capabilities().current {
                continue;
            }
            match adapter.fetch_current().await {
                Ok(quote) => {
                    debug!(provider = %adapter.id(), price = quote.price, "current price fetched");
                    return Ok(quote);
                }
                Err(error) => {
                    warn!(provider = %adapter.id(), %error, "current price fetch failed");
                    attempts.push((adapter.id(), error));
                }
            }
        }
        Err(ChainExhausted { attempts })
    }

    pub async fn fetch_historical(&self, period: Period) -> Result<HistoricalSeries, ChainExhausted> {
        let mut attempts = Vec::new();
        for adapter in &self.adapters {
            if !adapter.enabled() {
                debug!(provider = %adapter.id(), "skipping disabled provider");
                continue;
            }
            if !adapter.capabilities().historical {
                continue;
            }
            match adapter.fetch_historical(period).await {
                Ok(series) => {
                    debug!(
                        provider = %adapter.id(),
                        %period,
                        points = series.prices.len(),
                        "historical series fetched"
                    );
                    return Ok(series);
                }
                Err(error) => {
                    warn!(provider = %adapter.id(), %period, %error, "historical fetch failed");
                    attempts.push((adapter.id(), error));
                }
            }
        }
        Err(ChainExhausted { attempts })
    }
}

/// Assembles the production chain: Yahoo futures first, then the Coinbase
/// rate, then the key-gated FCS and Alpha Vantage adapters.
pub struct ChainBuilder {
    http_client: Arc<dyn HttpClient>,
    fcs_api_key: Option<String>,
    alpha_vantage_api_key: Option<String>,
}

impl ChainBuilder {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            fcs_api_key: None,
            alpha_vantage_api_key: None,
        }
    }

    /// Reads `FCS_API_KEY` and `ALPHA_VANTAGE_API_KEY`; empty values count
    /// as unset.
    pub fn from_env() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            fcs_api_key: env_key("FCS_API_KEY"),
            alpha_vantage_api_key: env_key("ALPHA_VANTAGE_API_KEY"),
        }
    }

    pub fn with_fcs_api_key(mut self, key: Option<String>) -> Self {
        self.fcs_api_key = key;
        self
    }

    pub fn with_alpha_vantage_api_key(mut self, key: Option<String>) -> Self {
        self.alpha_vantage_api_key = key;
        self
    }

    pub fn build(self) -> FallbackChain {
        let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(YahooFuturesAdapter::new(self.http_client.clone())),
            Arc::new(CoinbaseRateAdapter::new(self.http_client.clone())),
            Arc::new(FcsAdapter::new(self.http_client.clone(), self.fcs_api_key)),
            Arc::new(AlphaVantageAdapter::new(
                self.http_client,
                self.alpha_vantage_api_key,
            )),
        ];
        FallbackChain::new(adapters)
    }
}

fn env_key(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;

    #[test]
    fn build_orders_providers_by_priority() {
        let chain = ChainBuilder::new(Arc::new(StaticHttpClient::with_json("{}")))
            .with_fcs_api_key(Some(String::from("k")))
            .with_alpha_vantage_api_key(Some(String::from("k")))
            .build();

        assert_eq!(
            chain.provider_ids(),
            vec![
                ProviderId::YahooFutures,
                ProviderId::Coinbase,
                ProviderId::Fcs,
                ProviderId::AlphaVantage,
            ]
        );
    }

    #[tokio::test]
    async fn empty_chain_exhausts_with_no_attempts() {
        let chain = FallbackChain::new(Vec::new());
        let error = chain.fetch_current().await.expect_err("nothing to try");
        assert!(error.attempts.is_empty());
    }
}
