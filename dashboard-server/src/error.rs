use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashboard_core::ProviderError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{error}")]
    Internal {
        error: String,
        details: Option<serde_json::Value>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn internal(error: impl Into<String>) -> Self {
        ApiError::Internal {
            error: error.into(),
            details: None,
        }
    }

    /// Weather keeps the three failure classes apart.
    pub fn weather(err: ProviderError) -> Self {
        match err {
            ProviderError::Config(_) => ApiError::internal("API key not configured"),
            ProviderError::NotFound(_) => ApiError::NotFound("City not found".to_string()),
            ProviderError::Upstream { message, details } => ApiError::Internal {
                error: "Failed to fetch weather data".to_string(),
                details: Some(details.unwrap_or(serde_json::Value::String(message))),
            },
        }
    }

    /// Currency collapses every failure into one generic body.
    pub fn currency(_: ProviderError) -> Self {
        ApiError::internal("Failed to fetch currency data")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(error) => (StatusCode::NOT_FOUND, ErrorBody { error, details: None }),
            ApiError::Internal { error, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody { error, details })
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_mapping_keeps_failure_classes() {
        assert!(matches!(
            ApiError::weather(ProviderError::NotFound("x".into())),
            ApiError::NotFound(msg) if msg == "City not found"
        ));
        assert!(matches!(
            ApiError::weather(ProviderError::Config("x".into())),
            ApiError::Internal { error, details: None } if error == "API key not configured"
        ));

        match ApiError::weather(ProviderError::upstream("timed out")) {
            ApiError::Internal { error, details } => {
                assert_eq!(error, "Failed to fetch weather data");
                assert_eq!(details, Some(serde_json::json!("timed out")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn currency_mapping_is_generic() {
        let err = ApiError::currency(ProviderError::NotFound("x".into()));
        assert_eq!(err.to_string(), "Failed to fetch currency data");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
