//! Upstream provider adapters.
//!
//! Each adapter wraps exactly one data source and owns its normalization
//! rules; the fallback chain never sees a raw provider payload.

mod alphavantage;
mod coinbase;
mod fcs;
mod yahoo;

pub use alphavantage::AlphaVantageAdapter;
pub use coinbase::CoinbaseRateAdapter;
pub use fcs::FcsAdapter;
pub use yahoo::YahooFuturesAdapter;
