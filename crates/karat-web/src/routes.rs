//! Route table and handlers.
//!
//! Every data route answers HTTP 200 with a schema-conforming body; a
//! degraded backend shows up only as `authoritative: false` in the payload.
//! The legacy route aliases mirror what older frontend builds still call.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};

use karat_core::news::{fallback_news, NewsItem};
use karat_core::signals::{indicators, trading_signals, Indicators, TradingSignal};
use karat_core::{GoldPriceService, HistoricalSeries, MarketStats, PriceQuote, PriceRange};

pub type SharedService = Arc<GoldPriceService>;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    period: Option<String>,
}

pub fn router(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gold/price", get(current_price))
        .route("/api/gold_price", get(current_price))
        .route("/get_gold_price", get(current_price))
        .route("/api/gold/historical", get(historical))
        .route("/api/historical_prices", get(historical))
        .route("/get_historical_prices", get(historical))
        .route("/api/gold/stats", get(market_stats))
        .route("/api/market_stats", get(market_stats))
        .route("/get_news", get(news))
        .route("/get_signals", get(signals))
        .route("/health", get(health))
        .layer(cors)
        .with_state(service)
}

async fn current_price(State(service): State<SharedService>) -> Json<PriceQuote> {
    Json(service.current_price().await)
}

async fn historical(
    State(service): State<SharedService>,
    Query(query): Query<PeriodQuery>,
) -> Json<HistoricalSeries> {
    Json(service.historical(query.period.as_deref()).await)
}

/// Stats payload with the legacy `week_52_range` alias older frontend
/// builds read instead of `year_range`.
#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: MarketStats,
    week_52_range: PriceRange,
}

async fn market_stats(State(service): State<SharedService>) -> Json<StatsResponse> {
    let stats = service.market_stats().await;
    let week_52_range = stats.year_range;
    Json(StatsResponse {
        stats,
        week_52_range,
    })
}

#[derive(Debug, Serialize)]
struct NewsResponse {
    status: &'static str,
    news: Vec<NewsItem>,
}

async fn news() -> Json<NewsResponse> {
    Json(NewsResponse {
        status: "success",
        news: fallback_news(OffsetDateTime::now_utc()),
    })
}

#[derive(Debug, Serialize)]
struct SignalsResponse {
    signals: Vec<TradingSignal>,
    indicators: Indicators,
    last_update: String,
}

async fn signals(
    State(service): State<SharedService>,
    Query(query): Query<PeriodQuery>,
) -> Json<SignalsResponse> {
    let series = service.historical(query.period.as_deref()).await;
    let closes = series.closes();
    let now = OffsetDateTime::now_utc();

    let last_update = now
        .format(&format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| now.unix_timestamp().to_string());

    Json(SignalsResponse {
        signals: trading_signals(&closes, now),
        indicators: indicators(&closes),
        last_update,
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "karat",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use karat_core::{Clock, FallbackChain, SystemClock, FALLBACK_CURRENT_PRICE};
    use tower::ServiceExt;

    /// Service with an empty chain: every response takes the deterministic
    /// fallback path, so the routes can be tested offline.
    fn offline_router() -> Router {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let service = Arc::new(GoldPriceService::new(FallbackChain::new(Vec::new()), clock));
        router(service)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler runs");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("body is JSON");
        (status, json)
    }

    #[tokio::test]
    async fn price_route_degrades_to_200_with_fallback_body() {
        let (status, json) = get_json(offline_router(), "/api/gold/price").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["price"], serde_json::json!(FALLBACK_CURRENT_PRICE));
        assert_eq!(json["authoritative"], serde_json::json!(false));
        assert!(json.get("change").is_none());
    }

    #[tokio::test]
    async fn legacy_price_alias_serves_the_same_shape() {
        let (status, json) = get_json(offline_router(), "/get_gold_price").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["authoritative"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn invalid_period_is_served_as_one_month() {
        let (status, json) =
            get_json(offline_router(), "/api/gold/historical?period=bogus").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["period"], serde_json::json!("1M"));
        assert_eq!(json["prices"].as_array().map(Vec::len), Some(30));
    }

    #[tokio::test]
    async fn stats_carry_the_legacy_week_52_alias() {
        let (status, json) = get_json(offline_router(), "/api/market_stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["week_52_range"], json["year_range"]);
        assert!(json["day_range"]["low"].as_f64().is_some());
    }

    #[tokio::test]
    async fn news_route_serves_the_curated_list() {
        let (status, json) = get_json(offline_router(), "/get_news").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], serde_json::json!("success"));
        assert_eq!(json["news"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn signals_route_serves_indicators_over_synthetic_data() {
        let (status, json) = get_json(offline_router(), "/get_signals?period=3M").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["indicators"]["rsi"].as_f64().is_some());
        assert!(json["signals"].is_array());
        assert!(json["last_update"].is_string());
    }

    #[tokio::test]
    async fn health_route_answers_ok() {
        let (status, json) = get_json(offline_router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], serde_json::json!("ok"));
    }
}
