use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Sentinel source for the hardcoded current-price literal used when every
/// provider fails.
pub const FALLBACK_SOURCE: &str = "Fallback Data";

/// Sentinel source for series produced by the synthetic generator.
pub const SYNTHETIC_SOURCE: &str = "Generated Fallback Data";

/// Canonical identifiers for the upstream providers, in no particular order;
/// chain priority is fixed by the [`ChainBuilder`](crate::ChainBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    YahooFutures,
    Coinbase,
    Fcs,
    AlphaVantage,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YahooFutures => "yahoo_futures",
            Self::Coinbase => "coinbase",
            Self::Fcs => "fcs",
            Self::AlphaVantage => "alpha_vantage",
        }
    }

    /// Human-readable name reported in the `source` field of responses,
    /// matching what the frontend has always displayed.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::YahooFutures => "Yahoo Finance (GC=F)",
            Self::Coinbase => "Coinbase",
            Self::Fcs => "FCS API",
            Self::AlphaVantage => "Alpha Vantage",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
