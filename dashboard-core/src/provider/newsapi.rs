use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config,
    fallback::FallbackPolicy,
    model::NormalizedNewsArticle,
    provider::{Provider, ProviderError, ProviderId, parse_body, send},
};

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Headlines returned per request.
pub const MAX_ARTICLES: usize = 5;

/// Demo keys shipped in sample `.env` files; treated as "no key".
pub const PLACEHOLDER_KEYS: &[&str] = &["0c6c7677050844aeb25f9379674d1c8a", "your_news_api_key"];

#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl NewsApiProvider {
    pub fn new(api_key: Option<String>, base_url: Option<String>, http: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !PLACEHOLDER_KEYS.contains(&key.as_str())),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        let id = ProviderId::NewsApi;
        Self::new(
            config.provider_api_key(id).map(str::to_owned),
            config.provider_base_url(id).map(str::to_owned),
            http,
        )
    }

    pub fn has_usable_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct NaSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaArticle {
    title: String,
    description: Option<String>,
    source: NaSource,
    published_at: String,
    url_to_image: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NaResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NaArticle>,
}

fn normalize(parsed: NaResponse) -> Result<Vec<NormalizedNewsArticle>, ProviderError> {
    match parsed.status.as_deref() {
        Some("ok") | None => {}
        Some(status) => {
            return Err(ProviderError::upstream(format!(
                "NewsAPI reported status '{status}': {}",
                parsed.message.as_deref().unwrap_or_default()
            )));
        }
    }

    if parsed.articles.is_empty() {
        return Err(ProviderError::upstream("NewsAPI returned no articles"));
    }

    Ok(parsed
        .articles
        .into_iter()
        .take(MAX_ARTICLES)
        .map(|article| NormalizedNewsArticle {
            title: article.title,
            description: article.description,
            source: article.source.name.unwrap_or_else(|| "Unknown".to_string()),
            published_at: article.published_at,
            image: article.url_to_image,
            url: article.url,
        })
        .collect())
}

#[async_trait]
impl Provider for NewsApiProvider {
    type Query = str;
    type Output = Vec<NormalizedNewsArticle>;

    fn id(&self) -> ProviderId {
        ProviderId::NewsApi
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::NEWS
    }

    async fn fetch(&self, country: &str) -> Result<Vec<NormalizedNewsArticle>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Config("News API key not configured".to_string()))?;

        let url = format!("{}/v2/top-headlines", self.base_url.trim_end_matches('/'));
        let page_size = MAX_ARTICLES.to_string();
        let request = self.http.get(url).query(&[
            ("country", country),
            ("apiKey", api_key),
            ("pageSize", page_size.as_str()),
        ]);

        let (status, body) = send(ProviderId::NewsApi, request).await?;
        if !status.is_success() {
            return Err(ProviderError::from_status(ProviderId::NewsApi, status, &body));
        }

        let parsed: NaResponse = parse_body(ProviderId::NewsApi, &body)?;
        normalize(parsed)
    }
}
