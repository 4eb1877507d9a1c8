use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Historical-range selector exposed by the HTTP contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

/// Distance between consecutive points in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSpacing {
    Hourly,
    Daily,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1D" => Some(Self::OneDay),
            "1W" => Some(Self::OneWeek),
            "1M" => Some(Self::OneMonth),
            "3M" => Some(Self::ThreeMonths),
            "6M" => Some(Self::SixMonths),
            "1Y" => Some(Self::OneYear),
            _ => None,
        }
    }

    /// Resolve an optional query parameter. Missing or unrecognized values
    /// fall back to 1M rather than erroring, so a bogus period is
    /// indistinguishable from asking for 1M outright.
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Self::OneMonth)
    }

    /// Canonical number of points for a full window.
    pub const fn point_count(self) -> usize {
        match self {
            Self::OneDay => 24,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    pub const fn spacing(self) -> PointSpacing {
        match self {
            Self::OneDay => PointSpacing::Hourly,
            _ => PointSpacing::Daily,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
