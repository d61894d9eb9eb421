use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    Config,
    model::{Coordinates, NormalizedWeather},
    provider::{Provider, ProviderError, ProviderId, parse_body, send},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: Option<String>, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        let id = ProviderId::OpenWeather;
        Self::new(
            config.provider_api_key(id).map(str::to_owned),
            config.provider_base_url(id).map(str::to_owned),
            http,
        )
    }

    async fn fetch_current(&self, api_key: &str, city: &str) -> Result<NormalizedWeather, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));

        // `query` percent-encodes the free-text city name.
        let request = self.http.get(url).query(&[
            ("q", city),
            ("appid", api_key),
            ("units", "metric"),
            ("lang", "en"),
        ]);

        let (status, body) = send(ProviderId::OpenWeather, request).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound("City not found".to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::from_status(ProviderId::OpenWeather, status, &body));
        }

        let parsed: OwCurrentResponse = parse_body(ProviderId::OpenWeather, &body)?;
        normalize(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
    coord: OwCoord,
}

fn normalize(parsed: OwCurrentResponse) -> Result<NormalizedWeather, ProviderError> {
    let OwCurrentResponse { name, sys, main, weather, wind, rain, coord } = parsed;

    let first = weather
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::upstream("OpenWeather response contained no weather entries"))?;

    Ok(NormalizedWeather {
        city: name,
        country: sys.country,
        temperature: round_half_up(main.temp),
        feels_like: round_half_up(main.feels_like),
        description: first.description,
        condition: first.main,
        humidity: main.humidity,
        pressure: main.pressure,
        wind_speed: wind.speed,
        rain_3h: rain.and_then(|r| r.three_hours).unwrap_or(0.0),
        icon: first.icon,
        coordinates: Coordinates { lat: coord.lat, lon: coord.lon },
    })
}

/// Nearest integer; ties go toward positive infinity (-2.5 -> -2).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[async_trait]
impl Provider for OpenWeatherProvider {
    type Query = str;
    type Output = NormalizedWeather;

    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn fetch(&self, city: &str) -> Result<NormalizedWeather, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Config("API key not configured".to_string()))?;

        self.fetch_current(api_key, city).await
    }
}
