//! Provider adapter contract.
//!
//! Every upstream data source implements [`ProviderAdapter`]: one bounded
//! network call per invocation, returning either a normalized value or a
//! typed failure. Failures are values; an adapter must never panic past its
//! boundary.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::HttpError;
use crate::{HistoricalSeries, Period, PriceQuote, ProviderId};

/// Failure classification used by the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFailureKind {
    /// Upstream answered but carried no usable value (also covers
    /// non-timeout transport faults such as DNS or connect errors).
    NoData,
    /// The bounded per-call deadline expired.
    Timeout,
    /// Upstream returned a non-success HTTP status.
    HttpStatus(u16),
    /// The response body did not match the provider's documented shape.
    Parse,
}

/// Typed adapter failure. Recovered locally by the chain, which logs it and
/// moves to the next adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterError {
    kind: AdapterFailureKind,
    message: String,
}

impl AdapterError {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterFailureKind::NoData,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterFailureKind::Timeout,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self {
            kind: AdapterFailureKind::HttpStatus(status),
            message: format!("upstream returned status {status}"),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterFailureKind::Parse,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> AdapterFailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HttpError> for AdapterError {
    fn from(error: HttpError) -> Self {
        if error.timed_out() {
            Self::timeout(error.message().to_owned())
        } else {
            Self::no_data(error.message().to_owned())
        }
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            AdapterFailureKind::NoData => write!(f, "no data: {}", self.message),
            AdapterFailureKind::Timeout => write!(f, "timeout: {}", self.message),
            AdapterFailureKind::HttpStatus(status) => {
                write!(f, "http status {status}: {}", self.message)
            }
            AdapterFailureKind::Parse => write!(f, "parse error: {}", self.message),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Which resource kinds an adapter can serve. Market stats are derived from
/// the current price and historical windows, so they carry no capability of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    pub current: bool,
    pub historical: bool,
}

impl CapabilitySet {
    pub const fn new(current: bool, historical: bool) -> Self {
        Self {
            current,
            historical,
        }
    }

    pub const fn current_only() -> Self {
        Self::new(true, false)
    }

    pub const fn full() -> Self {
        Self::new(true, true)
    }
}

pub type AdapterFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, AdapterError>> + Send + 'a>>;

/// Upstream provider contract.
///
/// Implementations must be `Send + Sync`; the chain shares them across
/// request-handling tasks.
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn capabilities(&self) -> CapabilitySet;

    /// Whether the adapter is usable with the current configuration.
    /// Key-gated adapters report `false` when their credential is absent;
    /// the chain then skips them without a network call and without
    /// counting a failure. That state is a configuration no-op, not an
    /// error.
    fn enabled(&self) -> bool {
        true
    }

    /// Fetch and normalize the current price. Prices are rounded to 2
    /// digits at normalization; `change`/`change_percent` only when the
    /// provider exposes a prior-session comparison.
    fn fetch_current<'a>(&'a self) -> AdapterFuture<'a, PriceQuote>;

    /// Fetch and normalize a historical series for the period's window.
    fn fetch_historical<'a>(&'a self, period: Period) -> AdapterFuture<'a, HistoricalSeries>;
}
