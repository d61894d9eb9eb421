use crate::{
    Config,
    fallback::{FallbackData, FallbackPolicy, ProviderResult},
    model::{NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather},
    provider::{exchangerate::ExchangeRateProvider, newsapi::NewsApiProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use chrono::Utc;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod exchangerate;
pub mod newsapi;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    NewsApi,
    ExchangeRate,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::NewsApi => "newsapi",
            ProviderId::ExchangeRate => "exchangerate",
        }
    }

    /// Environment variable carrying the provider's credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::NewsApi => "NEWS_API_KEY",
            ProviderId::ExchangeRate => "EXCHANGERATE_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::NewsApi, ProviderId::ExchangeRate]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" | "weather" => Ok(ProviderId::OpenWeather),
            "newsapi" | "news" => Ok(ProviderId::NewsApi),
            "exchangerate" | "currency" => Ok(ProviderId::ExchangeRate),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, newsapi, exchangerate."
            )),
        }
    }
}

/// Failure taxonomy shared by all adapters.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential missing; detected before any network call.
    #[error("{0}")]
    Config(String),
    /// Vendor confirmed the queried entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Transport failure, non-2xx status or malformed body.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl ProviderError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ProviderError::Upstream {
            message: message.into(),
            details: None,
        }
    }

    /// Non-2xx response; keeps the vendor body as JSON when it parses.
    pub fn from_status(provider: ProviderId, status: reqwest::StatusCode, body: &str) -> Self {
        let details = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(truncate_body(body)));

        ProviderError::Upstream {
            message: format!("{provider} request failed with status {status}"),
            details: Some(details),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Config(_) => "config",
            ProviderError::NotFound(_) => "not_found",
            ProviderError::Upstream { .. } => "upstream",
        }
    }
}

/// One upstream vendor: URL shape, credential, schema mapping.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    type Query: Send + Sync + Debug + ?Sized;
    type Output: FallbackData + Send;

    fn id(&self) -> ProviderId;

    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::NONE
    }

    /// Single upstream attempt, no retries.
    async fn fetch(&self, query: &Self::Query) -> Result<Self::Output, ProviderError>;

    /// [`Provider::fetch`] followed by the adapter's fallback policy.
    async fn resolve(&self, query: &Self::Query) -> ProviderResult<Self::Output> {
        let outcome = self.fetch(query).await;

        if let Err(err) = &outcome {
            match err {
                ProviderError::Upstream { message, details } => {
                    tracing::error!(provider = %self.id(), ?query, %message, ?details, "upstream call failed");
                }
                other => {
                    tracing::warn!(provider = %self.id(), ?query, kind = other.kind(), error = %other, "provider call failed");
                }
            }
        }

        let result = self.fallback_policy().apply(outcome, Utc::now());
        if let ProviderResult::Fallback(_, reason) = &result {
            tracing::warn!(provider = %self.id(), ?reason, "serving fallback data");
        }
        result
    }
}

pub type WeatherProvider = dyn Provider<Query = str, Output = NormalizedWeather>;
pub type NewsProvider = dyn Provider<Query = str, Output = Vec<NormalizedNewsArticle>>;
pub type CurrencyProvider = dyn Provider<Query = str, Output = NormalizedCurrencyQuote>;

/// The three adapters, built once from config.
#[derive(Debug, Clone)]
pub struct Providers {
    pub weather: Arc<WeatherProvider>,
    pub news: Arc<NewsProvider>,
    pub currency: Arc<CurrencyProvider>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Self {
        let http = reqwest::Client::new();

        Self {
            weather: Arc::new(OpenWeatherProvider::from_config(config, http.clone())),
            news: Arc::new(NewsApiProvider::from_config(config, http.clone())),
            currency: Arc::new(ExchangeRateProvider::from_config(config, http)),
        }
    }
}

/// Send `request` and read the full body. Transport failures map to
/// [`ProviderError::Upstream`].
pub(crate) async fn send(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
) -> Result<(reqwest::StatusCode, String), ProviderError> {
    let res = request.send().await.map_err(|err| {
        ProviderError::upstream(format!("Failed to send request to {provider}: {err}"))
    })?;

    let status = res.status();
    let body = res.text().await.map_err(|err| {
        ProviderError::upstream(format!("Failed to read {provider} response body: {err}"))
    })?;

    Ok((status, body))
}

pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(
    provider: ProviderId,
    body: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|err| ProviderError::Upstream {
        message: format!("Failed to parse {provider} JSON: {err}"),
        details: Some(serde_json::Value::String(truncate_body(body))),
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
