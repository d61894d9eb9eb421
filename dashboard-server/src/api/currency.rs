use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use dashboard_core::{
    NormalizedCurrencyQuote, Provider,
    model::{DEFAULT_BASE_CURRENCY, or_default_param},
};
use crate::{
    api::first_param,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn get_currency(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<NormalizedCurrencyQuote>> {
    let base = or_default_param(first_param(&params, "base"), DEFAULT_BASE_CURRENCY);
    tracing::info!(%base, "currency request");

    let quote = state
        .providers
        .currency
        .resolve(&base)
        .await
        .into_result()
        .map_err(ApiError::currency)?;

    Ok(Json(quote))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/currency", get(get_currency))
}
