use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use dashboard_core::{
    NormalizedWeather, Provider,
    model::{DEFAULT_CITY, or_default_param},
};
use crate::{
    api::first_param,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<NormalizedWeather>> {
    let city = or_default_param(first_param(&params, "city"), DEFAULT_CITY);
    tracing::info!(%city, "weather request");

    let weather = state
        .providers
        .weather
        .resolve(&city)
        .await
        .into_result()
        .map_err(ApiError::weather)?;

    tracing::info!(city = %weather.city, temperature = weather.temperature, "weather data prepared");
    Ok(Json(weather))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/weather", get(get_weather))
}
