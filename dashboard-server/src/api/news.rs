use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use dashboard_core::{
    Fallback, NormalizedNewsArticle, Provider,
    fallback::FallbackData,
    model::{DEFAULT_COUNTRY, or_default_param},
};
use crate::{api::first_param, main_lib::AppState};

/// Always 200 with an array; the adapter's policy turns failures into
/// fallback lists.
async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<NormalizedNewsArticle>> {
    let country = or_default_param(first_param(&params, "country"), DEFAULT_COUNTRY);
    tracing::info!(%country, "news request");

    let articles = match state.providers.news.resolve(&country).await.into_result() {
        Ok(articles) => articles,
        Err(err) => {
            tracing::error!(error = %err, "news provider surfaced an error; serving sentinel");
            Vec::<NormalizedNewsArticle>::fallback(Fallback::SingleSentinel, Utc::now()).unwrap_or_default()
        }
    };

    Json(articles)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/news", get(get_news))
}
