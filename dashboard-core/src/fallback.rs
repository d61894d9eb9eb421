//! Declarative substitution of static data for failed or unconfigured providers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    model::{NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather},
    provider::ProviderError,
};

/// What to substitute in place of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Propagate the error.
    None,
    /// Fixed demo content.
    StaticList,
    /// A single "temporarily unavailable" entry.
    SingleSentinel,
}

/// Why a fallback was served instead of live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    Unconfigured,
    UpstreamFailure,
}

/// Per-adapter policy: which [`Fallback`] applies to each failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub unconfigured: Fallback,
    pub upstream_failure: Fallback,
}

impl FallbackPolicy {
    pub const NONE: Self = Self {
        unconfigured: Fallback::None,
        upstream_failure: Fallback::None,
    };

    pub const NEWS: Self = Self {
        unconfigured: Fallback::StaticList,
        upstream_failure: Fallback::SingleSentinel,
    };

    pub fn for_error(&self, error: &ProviderError) -> (Fallback, FallbackReason) {
        match error {
            ProviderError::Config(_) => (self.unconfigured, FallbackReason::Unconfigured),
            ProviderError::NotFound(_) | ProviderError::Upstream { .. } => {
                (self.upstream_failure, FallbackReason::UpstreamFailure)
            }
        }
    }

    /// Turn a raw adapter outcome into a [`ProviderResult`].
    pub fn apply<T: FallbackData>(
        &self,
        outcome: Result<T, ProviderError>,
        now: DateTime<Utc>,
    ) -> ProviderResult<T> {
        match outcome {
            Ok(value) => ProviderResult::Ok(value),
            Err(err) => {
                let (kind, reason) = self.for_error(&err);
                match T::fallback(kind, now) {
                    Some(value) => ProviderResult::Fallback(value, reason),
                    None => ProviderResult::Error(err),
                }
            }
        }
    }
}

/// Outcome of one adapter call after the fallback policy ran.
#[derive(Debug)]
pub enum ProviderResult<T> {
    Ok(T),
    Fallback(T, FallbackReason),
    Error(ProviderError),
}

impl<T> ProviderResult<T> {
    /// Live or substituted data; both are schema-identical to callers.
    pub fn into_result(self) -> Result<T, ProviderError> {
        match self {
            ProviderResult::Ok(value) | ProviderResult::Fallback(value, _) => Ok(value),
            ProviderResult::Error(err) => Err(err),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ProviderResult::Fallback(..))
    }
}

/// Types that have static substitutes.
pub trait FallbackData: Sized {
    fn fallback(kind: Fallback, now: DateTime<Utc>) -> Option<Self>;
}

impl FallbackData for NormalizedWeather {
    fn fallback(_: Fallback, _: DateTime<Utc>) -> Option<Self> {
        None
    }
}

impl FallbackData for NormalizedCurrencyQuote {
    fn fallback(_: Fallback, _: DateTime<Utc>) -> Option<Self> {
        None
    }
}

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x150";

const STATIC_ARTICLES: [(&str, &str, &str); 3] = [
    (
        "Latest News from Kazakhstan",
        "Current events and updates from the region",
        "Local News",
    ),
    (
        "Weather Dashboard Project Complete",
        "Successfully implemented weather, news, and currency features",
        "Project Update",
    ),
    (
        "Technology News",
        "Latest developments in web development and APIs",
        "Tech News",
    ),
];

impl FallbackData for Vec<NormalizedNewsArticle> {
    fn fallback(kind: Fallback, now: DateTime<Utc>) -> Option<Self> {
        let published_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        match kind {
            Fallback::None => None,
            Fallback::StaticList => Some(
                STATIC_ARTICLES
                    .iter()
                    .map(|(title, description, source)| NormalizedNewsArticle {
                        title: (*title).to_string(),
                        description: Some((*description).to_string()),
                        source: (*source).to_string(),
                        published_at: published_at.clone(),
                        image: Some(PLACEHOLDER_IMAGE.to_string()),
                        url: None,
                    })
                    .collect(),
            ),
            Fallback::SingleSentinel => Some(vec![NormalizedNewsArticle {
                title: "News service temporarily unavailable".to_string(),
                description: Some("Please check back later for updates".to_string()),
                source: "System".to_string(),
                published_at,
                image: None,
                url: None,
            }]),
        }
    }
}
