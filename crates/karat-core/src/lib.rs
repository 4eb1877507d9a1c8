//! # Karat Core
//!
//! Provider fallback, caching and normalization core for the karat gold
//! price proxy.
//!
//! ## Overview
//!
//! This crate provides the foundational components for karat:
//!
//! - **Canonical domain models** for quotes, historical series and market stats
//! - **Provider adapters** for Yahoo Finance futures, Coinbase, FCS and Alpha Vantage
//! - **Fallback chain** that tries providers in fixed priority order
//! - **Freshness-window cache** keyed by logical resource
//! - **Synthetic generator** for deterministic offline series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo futures, Coinbase, FCS, Alpha Vantage) |
//! | [`cache`] | Resource-keyed cache with per-key freshness windows |
//! | [`chain`] | Sequential provider fallback |
//! | [`clock`] | Injectable time source |
//! | [`domain`] | Canonical models (PriceQuote, HistoricalSeries, MarketStats) |
//! | [`http_client`] | HTTP client abstraction |
//! | [`news`] | Fallback market headlines |
//! | [`provider`] | Adapter trait and failure types |
//! | [`service`] | Orchestration behind the HTTP handlers |
//! | [`signals`] | Indicator-based trading signals |
//! | [`source`] | Provider identifiers and source labels |
//! | [`synthetic`] | Date-seeded synthetic series |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use karat_core::GoldPriceService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = GoldPriceService::from_env();
//!
//!     // Never fails; degraded results carry `authoritative: false`.
//!     let quote = service.current_price().await;
//!     println!("gold: ${:.2} via {}", quote.price, quote.source);
//! }
//! ```
//!
//! ## Degradation Model
//!
//! Operations on [`GoldPriceService`] are infallible by contract. When every
//! provider in the chain fails, the current price falls back to a fixed
//! literal and historical series to the deterministic synthetic generator;
//! `authoritative: false` is the only signal of degradation.

pub mod adapters;
pub mod cache;
pub mod chain;
pub mod clock;
pub mod domain;
pub mod http_client;
pub mod news;
pub mod provider;
pub mod service;
pub mod signals;
pub mod source;
pub mod synthetic;

// Re-export commonly used types at crate root for convenience

// Canonical domain models
pub use domain::{
    round2, HistoricalSeries, MarketStats, Period, PointSpacing, PricePoint, PriceQuote,
    PriceRange,
};

// Provider identifiers and source labels
pub use source::{ProviderId, FALLBACK_SOURCE, SYNTHETIC_SOURCE};

// Adapter contract
pub use provider::{AdapterError, AdapterFailureKind, CapabilitySet, ProviderAdapter};

// Fallback chain
pub use chain::{ChainBuilder, ChainExhausted, FallbackChain};

// Caching
pub use cache::{CacheStore, CachedValue, ResourceKey};

// Orchestration
pub use service::{GoldPriceService, FALLBACK_CURRENT_PRICE};

// Synthetic data
pub use synthetic::{SyntheticGenerator, SYNTHETIC_BASE_PRICE};

// Time source
pub use clock::{Clock, ManualClock, SystemClock};
