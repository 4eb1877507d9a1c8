//! Indicator-based trading signals over a close-price series.
//!
//! Three detectors: SMA 20/50 crossover, RSI(14) extremes, and short-term
//! price action read as mean reversion (a sharp rise is a sell, a sharp drop
//! a buy). Each emits at most one signal per evaluation.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::rfc3339;
use crate::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingSignal {
    #[serde(rename = "type")]
    pub kind: String,
    pub signal: SignalAction,
    pub strength: SignalStrength,
    pub description: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// Technical indicator block served alongside the signals. Every field is
/// optional; a series too short for an indicator simply omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Indicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_strength: Option<f64>,
}

/// Compute the indicator block for a close series. Empty below 14 prices.
pub fn indicators(prices: &[f64]) -> Indicators {
    if prices.len() < 14 {
        return Indicators::default();
    }

    let mut block = Indicators {
        rsi: rsi14(prices).map(round2),
        sma20: sma(prices, 20).map(round2),
        sma50: sma(prices, 50).map(round2),
        current_price: prices.last().copied().map(round2),
        ..Indicators::default()
    };

    if prices.len() >= 10 {
        let anchor = prices[prices.len() - 10];
        let recent_trend = prices[prices.len() - 1] - anchor;
        block.trend = Some(if recent_trend > 0.0 {
            TrendDirection::Bullish
        } else if recent_trend < 0.0 {
            TrendDirection::Bearish
        } else {
            TrendDirection::Neutral
        });
        if anchor != 0.0 {
            block.trend_strength = Some(round2(recent_trend / anchor * 100.0).abs());
        }
    }

    block
}

/// Simple moving average over the last `window` prices.
pub fn sma(prices: &[f64], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window {
        return None;
    }
    let tail = &prices[prices.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// RSI over the last 14 deltas. A flat or rising-only window has no losses
/// and reads as neutral 50 rather than pinned at 100.
pub fn rsi14(prices: &[f64]) -> Option<f64> {
    if prices.len() < 14 {
        return None;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let tail = &deltas[deltas.len().saturating_sub(14)..];

    let avg_gain = tail.iter().filter(|d| **d > 0.0).sum::<f64>() / tail.len() as f64;
    let avg_loss = -tail.iter().filter(|d| **d < 0.0).sum::<f64>() / tail.len() as f64;

    if avg_loss == 0.0 {
        return Some(50.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Evaluate all detectors against a close series. `now` stamps the signals.
pub fn trading_signals(prices: &[f64], now: OffsetDateTime) -> Vec<TradingSignal> {
    let mut signals = Vec::new();
    if prices.len() < 14 {
        return signals;
    }
    let timestamp = rfc3339(now);

    if let (Some(sma20), Some(sma50)) = (sma(prices, 20), sma(prices, 50)) {
        if sma20 > sma50 {
            signals.push(TradingSignal {
                kind: String::from("SMA Crossover"),
                signal: SignalAction::Buy,
                strength: SignalStrength::Medium,
                description: String::from("20-day SMA crossed above 50-day SMA"),
                timestamp: timestamp.clone(),
            });
        } else if sma20 < sma50 {
            signals.push(TradingSignal {
                kind: String::from("SMA Crossover"),
                signal: SignalAction::Sell,
                strength: SignalStrength::Medium,
                description: String::from("20-day SMA crossed below 50-day SMA"),
                timestamp: timestamp.clone(),
            });
        }
    }

    if let Some(rsi) = rsi14(prices) {
        if rsi < 30.0 {
            signals.push(TradingSignal {
                kind: String::from("RSI"),
                signal: SignalAction::Buy,
                strength: SignalStrength::Strong,
                description: format!("RSI is oversold at {rsi:.2}"),
                timestamp: timestamp.clone(),
            });
        } else if rsi > 70.0 {
            signals.push(TradingSignal {
                kind: String::from("RSI"),
                signal: SignalAction::Sell,
                strength: SignalStrength::Strong,
                description: format!("RSI is overbought at {rsi:.2}"),
                timestamp: timestamp.clone(),
            });
        }
    }

    if prices.len() >= 5 {
        let anchor = prices[prices.len() - 5];
        if anchor != 0.0 {
            let recent_change = (prices[prices.len() - 1] - anchor) / anchor * 100.0;
            if recent_change > 1.0 {
                signals.push(TradingSignal {
                    kind: String::from("Price Action"),
                    signal: SignalAction::Sell,
                    strength: SignalStrength::Weak,
                    description: format!(
                        "Price rose {recent_change:.2}% in the last 5 periods"
                    ),
                    timestamp,
                });
            } else if recent_change < -1.0 {
                signals.push(TradingSignal {
                    kind: String::from("Price Action"),
                    signal: SignalAction::Buy,
                    strength: SignalStrength::Weak,
                    description: format!(
                        "Price fell {:.2}% in the last 5 periods",
                        recent_change.abs()
                    ),
                    timestamp,
                });
            }
        }
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-03-15 12:00 UTC);

    #[test]
    fn sma_needs_a_full_window() {
        assert_eq!(sma(&[1.0, 2.0, 3.0], 4), None);
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 4), Some(2.5));
    }

    #[test]
    fn monotone_rise_reads_neutral_rsi() {
        let prices: Vec<f64> = (0..20).map(|i| 3000.0 + i as f64).collect();
        assert_eq!(rsi14(&prices), Some(50.0));
    }

    #[test]
    fn short_series_emits_no_signals() {
        let prices = vec![3000.0; 10];
        assert!(trading_signals(&prices, NOW).is_empty());
    }

    #[test]
    fn steep_recent_drop_emits_weak_buy() {
        let mut prices = vec![3000.0; 20];
        let len = prices.len();
        prices[len - 1] = 2900.0;

        let signals = trading_signals(&prices, NOW);
        let action = signals
            .iter()
            .find(|s| s.kind == "Price Action")
            .map(|s| s.signal);
        assert_eq!(action, Some(SignalAction::Buy));
    }

    #[test]
    fn uptrend_with_long_history_emits_sma_buy() {
        let prices: Vec<f64> = (0..60).map(|i| 3000.0 + i as f64 * 2.0).collect();
        let signals = trading_signals(&prices, NOW);

        let sma_signal = signals
            .iter()
            .find(|s| s.kind == "SMA Crossover")
            .map(|s| s.signal);
        assert_eq!(sma_signal, Some(SignalAction::Buy));
    }

    #[test]
    fn indicator_block_is_empty_below_fourteen_prices() {
        let block = indicators(&[3000.0; 10]);
        assert_eq!(block, Indicators::default());
    }

    #[test]
    fn indicator_block_reads_a_rise_as_bullish() {
        let prices: Vec<f64> = (0..30).map(|i| 3000.0 + i as f64).collect();
        let block = indicators(&prices);

        assert_eq!(block.rsi, Some(50.0));
        assert_eq!(block.sma20, Some(3019.5));
        assert_eq!(block.sma50, None);
        assert_eq!(block.current_price, Some(3029.0));
        assert_eq!(block.trend, Some(TrendDirection::Bullish));
        assert_eq!(block.trend_strength, Some(0.3));
    }

    #[test]
    fn signal_json_uses_the_type_field_name() {
        let signals = {
            let prices: Vec<f64> = (0..60).map(|i| 3000.0 + i as f64 * 2.0).collect();
            trading_signals(&prices, NOW)
        };
        let json = serde_json::to_value(&signals[0]).expect("signal serializes");

        assert_eq!(json["type"], serde_json::json!("SMA Crossover"));
        assert_eq!(json["signal"], serde_json::json!("buy"));
        assert_eq!(json["strength"], serde_json::json!("medium"));
    }
}
