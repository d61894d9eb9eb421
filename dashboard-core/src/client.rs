//! Browser-side half of the dashboard: calls the aggregation endpoints and
//! sequences one search into the view regions.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather};

pub mod orchestrator;
pub mod view;

pub use orchestrator::{BranchState, Orchestrator, SearchReport};
pub use view::{DashboardView, MapView, Panel, Region, SnapshotView};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The three aggregation endpoints as seen by the client.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn weather(&self, city: &str) -> Result<NormalizedWeather, ClientError>;
    async fn news(&self, country: &str) -> Result<Vec<NormalizedNewsArticle>, ClientError>;
    async fn currency(&self, base: &str) -> Result<NormalizedCurrencyQuote, ClientError>;
}

#[async_trait]
impl<T: DashboardApi + ?Sized> DashboardApi for std::sync::Arc<T> {
    async fn weather(&self, city: &str) -> Result<NormalizedWeather, ClientError> {
        (**self).weather(city).await
    }

    async fn news(&self, country: &str) -> Result<Vec<NormalizedNewsArticle>, ClientError> {
        (**self).news(country).await
    }

    async fn currency(&self, base: &str) -> Result<NormalizedCurrencyQuote, ClientError> {
        (**self).currency(base).await
    }
}

/// [`DashboardApi`] over HTTP against a running dashboard server.
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base_url: String,
    http: Client,
}

impl HttpDashboardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, param: (&str, &str)) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(url)
            .query(&[param])
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        res.json::<T>().await.map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn weather(&self, city: &str) -> Result<NormalizedWeather, ClientError> {
        self.get_json("/api/weather", ("city", city)).await
    }

    async fn news(&self, country: &str) -> Result<Vec<NormalizedNewsArticle>, ClientError> {
        self.get_json("/api/news", ("country", country)).await
    }

    async fn currency(&self, base: &str) -> Result<NormalizedCurrencyQuote, ClientError> {
        self.get_json("/api/currency", ("base", base)).await
    }
}
