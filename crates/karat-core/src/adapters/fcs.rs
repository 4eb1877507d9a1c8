use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{AdapterError, AdapterFuture, CapabilitySet, ProviderAdapter};
use crate::{round2, HistoricalSeries, Period, PricePoint, PriceQuote, ProviderId};

const LATEST_URL: &str = "https://fcsapi.com/api-v3/forex/latest?symbol=XAU/USD";
const HISTORY_URL: &str = "https://fcsapi.com/api-v3/forex/history?symbol=XAU/USD&period=1d";

/// FCS XAU/USD adapter. Key-gated: without `FCS_API_KEY` the adapter reports
/// itself disabled and the chain skips it without a network call.
///
/// History is daily regardless of the requested period; the 1D period is
/// served at daily resolution, which the series contract allows (fewer
/// records than the canonical count, never padded). The endpoint takes no
/// range parameter and routinely returns hundreds of records, so the parsed
/// series is windowed to the period's canonical point count.
pub struct FcsAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
}

impl FcsAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
        }
    }

    fn access_key(&self) -> Result<&str, AdapterError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AdapterError::no_data("fcs adapter is not configured"))
    }
}

impl ProviderAdapter for FcsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Fcs
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote> {
        Box::pin(async move {
            let key = self.access_key()?;
            let url = format!("{LATEST_URL}&access_key={}", urlencoding::encode(key));

            let response = self.http_client.execute(HttpRequest::get(url)).await?;
            if !response.is_success() {
                return Err(AdapterError::http_status(response.status));
            }

            let latest: LatestResponse = serde_json::from_str(&response.body)
                .map_err(|e| AdapterError::parse(format!("fcs latest body: {e}")))?;
            if !latest.status {
                return Err(AdapterError::no_data(
                    latest.msg.unwrap_or_else(|| String::from("fcs reported failure")),
                ));
            }

            let record = latest
                .response
                .first()
                .ok_or_else(|| AdapterError::no_data("fcs latest carried no records"))?;
            let price: f64 = record
                .price
                .parse()
                .map_err(|_| AdapterError::parse(format!("fcs price '{}'", record.price)))?;

            Ok(PriceQuote::authoritative(
                round2(price),
                None,
                None,
                self.id().display_name(),
            ))
        })
    }

    fn fetch_historical<'a>(&'a self, period: Period) -> AdapterFuture<'a, HistoricalSeries> {
        Box::pin(async move {
            let key = self.access_key()?;
            let url = format!("{HISTORY_URL}&access_key={}", urlencoding::encode(key));

            let response = self.http_client.execute(HttpRequest::get(url)).await?;
            if !response.is_success() {
                return Err(AdapterError::http_status(response.status));
            }

            let history: HistoryResponse = serde_json::from_str(&response.body)
                .map_err(|e| AdapterError::parse(format!("fcs history body: {e}")))?;
            if !history.status {
                return Err(AdapterError::no_data(
                    history.msg.unwrap_or_else(|| String::from("fcs reported failure")),
                ));
            }

            // Malformed records are dropped, not fatal.
            let points: Vec<PricePoint> = history
                .response
                .iter()
                .filter_map(|record| {
                    let close: f64 = record.c.parse().ok()?;
                    let date = record.date.split(' ').next()?.to_owned();
                    Some(PricePoint::close_only(date, round2(close)))
                })
                .collect();

            if points.is_empty() {
                return Err(AdapterError::no_data("fcs history carried no usable records"));
            }

            let mut series =
                HistoricalSeries::new(points, period, self.id().display_name(), true);
            series.truncate_to_recent(period.point_count());
            Ok(series)
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    response: Vec<LatestRecord>,
}

#[derive(Debug, Deserialize)]
struct LatestRecord {
    price: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    response: Vec<HistoryRecord>,
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    c: String,
    date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;

    #[test]
    fn adapter_without_key_is_disabled() {
        let adapter = FcsAdapter::new(Arc::new(StaticHttpClient::with_json("{}")), None);
        assert!(!adapter.enabled());
    }

    #[tokio::test]
    async fn latest_price_is_parsed_from_string_column() {
        let body = r#"{"status":true,"code":200,
            "response":[{"price":"3391.456","symbol":"XAU/USD"}]}"#;
        let adapter = FcsAdapter::new(
            Arc::new(StaticHttpClient::with_json(body)),
            Some(String::from("demo-key")),
        );

        let quote = adapter.fetch_current().await.expect("quote should parse");
        assert_eq!(quote.price, 3391.46);
        assert_eq!(quote.source, "FCS API");
    }

    #[tokio::test]
    async fn history_strips_time_component_and_drops_bad_records() {
        let body = r#"{"status":true,"code":200,"response":[
            {"c":"3380.551","date":"2024-03-14 00:00"},
            {"c":"not-a-number","date":"2024-03-15 00:00"},
            {"c":"3391.20","date":"2024-03-16 00:00"}]}"#;
        let adapter = FcsAdapter::new(
            Arc::new(StaticHttpClient::with_json(body)),
            Some(String::from("demo-key")),
        );

        let series = adapter
            .fetch_historical(Period::OneMonth)
            .await
            .expect("series should parse");

        assert_eq!(series.prices.len(), 2);
        assert_eq!(series.prices[0].date, "2024-03-14");
        assert_eq!(series.prices[0].price, 3380.55);
    }

    #[tokio::test]
    async fn long_history_is_windowed_to_the_period() {
        let records: Vec<String> = (1..=20)
            .map(|day| format!(r#"{{"c":"3380.5","date":"2024-03-{day:02} 00:00"}}"#))
            .collect();
        let body = format!(
            r#"{{"status":true,"code":200,"response":[{}]}}"#,
            records.join(",")
        );
        let adapter = FcsAdapter::new(
            Arc::new(StaticHttpClient::with_json(body)),
            Some(String::from("demo-key")),
        );

        let series = adapter
            .fetch_historical(Period::OneWeek)
            .await
            .expect("series should parse");

        assert_eq!(series.prices.len(), 7);
        assert_eq!(series.prices.first().map(|p| p.date.as_str()), Some("2024-03-14"));
        assert_eq!(series.prices.last().map(|p| p.date.as_str()), Some("2024-03-20"));
    }
}
