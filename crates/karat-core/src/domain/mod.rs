//! Canonical models shared by every provider adapter and the HTTP surface.

mod models;
mod period;

pub use models::{
    round2, HistoricalSeries, MarketStats, PricePoint, PriceQuote, PriceRange,
};
pub use period::{Period, PointSpacing};

pub(crate) use models::rfc3339;
