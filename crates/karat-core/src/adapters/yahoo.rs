use std::sync::Arc;

use serde::Deserialize;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{AdapterError, AdapterFuture, CapabilitySet, ProviderAdapter};
use crate::{round2, HistoricalSeries, Period, PointSpacing, PricePoint, PriceQuote, ProviderId};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/GC=F";

// Yahoo's unofficial chart API rejects default library user agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Gold futures (GC=F) adapter backed by the Yahoo Finance chart API.
///
/// The primary source: no credential required, and the only provider in the
/// chain that exposes enough session history to derive `change`.
pub struct YahooFuturesAdapter {
    http_client: Arc<dyn HttpClient>,
}

impl YahooFuturesAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    async fn fetch_chart(&self, range: &str, interval: &str) -> Result<ChartResult, AdapterError> {
        let url = format!("{CHART_URL}?range={range}&interval={interval}");
        let request = HttpRequest::get(url)
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout_ms(10_000);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(AdapterError::http_status(response.status));
        }

        let chart: ChartResponse = serde_json::from_str(&response.body)
            .map_err(|e| AdapterError::parse(format!("yahoo chart body: {e}")))?;

        chart
            .chart
            .result
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::no_data("yahoo chart carried no result"))
    }
}

impl ProviderAdapter for YahooFuturesAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::YahooFutures
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote> {
        Box::pin(async move {
            // Two daily sessions so the previous close is available.
            let result = self.fetch_chart("2d", "1d").await?;
            let closes = result.closes();
            let last = closes
                .last()
                .copied()
                .ok_or_else(|| AdapterError::no_data("yahoo chart carried no closes"))?;

            let price = round2(last);
            let (change, change_percent) = if closes.len() >= 2 {
                let session_open = round2(closes[0]);
                let change = round2(price - session_open);
                (Some(change), Some(round2(change / session_open * 100.0)))
            } else {
                (None, None)
            };

            Ok(PriceQuote::authoritative(
                price,
                change,
                change_percent,
                self.id().display_name(),
            ))
        })
    }

    fn fetch_historical<'a>(&'a self, period: Period) -> AdapterFuture<'a, HistoricalSeries> {
        Box::pin(async move {
            let (range, interval) = chart_window(period);
            let result = self.fetch_chart(range, interval).await?;

            let timestamps = result
                .timestamp
                .as_deref()
                .ok_or_else(|| AdapterError::no_data("yahoo chart carried no timestamps"))?;
            let quote = result
                .indicators
                .quote
                .first()
                .ok_or_else(|| AdapterError::no_data("yahoo chart carried no quote block"))?;

            let mut points = Vec::with_capacity(timestamps.len());
            for (index, &unix_ts) in timestamps.iter().enumerate() {
                let Some(Some(close)) = quote.close.get(index) else {
                    continue;
                };
                let date = format_point_date(unix_ts, period.spacing())?;

                points.push(PricePoint {
                    date,
                    price: round2(*close),
                    open: optional_round2(&quote.open, index),
                    high: optional_round2(&quote.high, index),
                    low: optional_round2(&quote.low, index),
                    volume: quote
                        .volume
                        .get(index)
                        .copied()
                        .flatten()
                        .map(|v| v.max(0) as u64),
                });
            }

            if points.is_empty() {
                return Err(AdapterError::no_data("yahoo chart carried no usable closes"));
            }

            Ok(HistoricalSeries::new(
                points,
                period,
                self.id().display_name(),
                true,
            ))
        })
    }
}

fn chart_window(period: Period) -> (&'static str, &'static str) {
    match period {
        Period::OneDay => ("1d", "1h"),
        Period::OneWeek => ("5d", "1d"),
        Period::OneMonth => ("1mo", "1d"),
        Period::ThreeMonths => ("3mo", "1d"),
        Period::SixMonths => ("6mo", "1d"),
        Period::OneYear => ("1y", "1d"),
    }
}

fn format_point_date(unix_ts: i64, spacing: PointSpacing) -> Result<String, AdapterError> {
    let ts = OffsetDateTime::from_unix_timestamp(unix_ts)
        .map_err(|e| AdapterError::parse(format!("yahoo timestamp {unix_ts}: {e}")))?;

    let description = match spacing {
        PointSpacing::Daily => format_description!("[year]-[month]-[day]"),
        PointSpacing::Hourly => format_description!("[year]-[month]-[day] [hour]:00"),
    };

    ts.format(&description)
        .map_err(|e| AdapterError::parse(format!("yahoo timestamp {unix_ts}: {e}")))
}

fn optional_round2(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten().map(round2)
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Vec<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

impl ChartResult {
    fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|quote| quote.close.iter().copied().flatten().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
