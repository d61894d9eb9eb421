use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::{
    Config,
    model::{NormalizedCurrencyQuote, TRACKED_RATE_CODES},
    provider::{Provider, ProviderError, ProviderId, parse_body, send},
};

const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

#[derive(Debug, Clone)]
pub struct ExchangeRateProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl ExchangeRateProvider {
    pub fn new(api_key: Option<String>, base_url: Option<String>, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        let id = ProviderId::ExchangeRate;
        Self::new(
            config.provider_api_key(id).map(str::to_owned),
            config.provider_base_url(id).map(str::to_owned),
            http,
        )
    }

    /// `{origin}/v6/{key}/latest/{base}` with each segment percent-encoded.
    fn latest_url(&self, api_key: &str, base: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            ProviderError::Config(format!("Invalid exchangerate base URL '{}': {err}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Config(format!("exchangerate base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v6", api_key, "latest", base]);

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ErResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    time_last_update_utc: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

fn normalize(parsed: ErResponse) -> Result<NormalizedCurrencyQuote, ProviderError> {
    if parsed.result.as_deref().is_some_and(|r| r != "success") {
        return Err(ProviderError::upstream(format!(
            "exchangerate reported an error: {}",
            parsed.error_type.as_deref().unwrap_or("unknown")
        )));
    }

    let base = parsed
        .base_code
        .ok_or_else(|| ProviderError::upstream("exchangerate response has no base_code"))?;
    let last_updated = parsed
        .time_last_update_utc
        .ok_or_else(|| ProviderError::upstream("exchangerate response has no time_last_update_utc"))?;

    let rates = TRACKED_RATE_CODES
        .iter()
        .map(|code| {
            parsed
                .conversion_rates
                .get(*code)
                .map(|rate| ((*code).to_string(), *rate))
                .ok_or_else(|| ProviderError::upstream(format!("exchangerate response has no {code} rate")))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(NormalizedCurrencyQuote { base, last_updated, rates })
}

#[async_trait]
impl Provider for ExchangeRateProvider {
    type Query = str;
    type Output = NormalizedCurrencyQuote;

    fn id(&self) -> ProviderId {
        ProviderId::ExchangeRate
    }

    async fn fetch(&self, base: &str) -> Result<NormalizedCurrencyQuote, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Config("Exchange rate API key not configured".to_string()))?;

        let url = self.latest_url(api_key, base)?;
        let (status, body) = send(ProviderId::ExchangeRate, self.http.get(url)).await?;

        if !status.is_success() {
            return Err(ProviderError::from_status(ProviderId::ExchangeRate, status, &body));
        }

        let parsed: ErResponse = parse_body(ProviderId::ExchangeRate, &body)?;
        normalize(parsed)
    }
}
