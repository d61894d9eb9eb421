//! Core library for the city dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Adapters for the weather, news and currency vendors
//! - The fallback policy applied to adapter outcomes
//! - The client-side orchestrator that drives one dashboard search
//!
//! It is used by `dashboard-server` and `dashboard-cli`.

pub mod client;
pub mod config;
pub mod fallback;
pub mod model;
pub mod provider;

pub use client::{DashboardApi, HttpDashboardApi, Orchestrator};
pub use config::{Config, ProviderConfig};
pub use fallback::{Fallback, FallbackPolicy, FallbackReason, ProviderResult};
pub use model::{NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather};
pub use provider::{Provider, ProviderError, ProviderId, Providers};
