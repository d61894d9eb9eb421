use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rate codes kept from the vendor's full conversion table.
pub const TRACKED_RATE_CODES: [&str; 4] = ["USD", "EUR", "RUB", "CNY"];

pub const DEFAULT_CITY: &str = "Almaty";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_BASE_CURRENCY: &str = "KZT";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    pub city: String,
    /// ISO 3166-1 alpha-2 code as reported by the vendor.
    pub country: String,
    /// Degrees Celsius, rounded to the nearest integer.
    pub temperature: i64,
    pub feels_like: i64,
    pub description: String,
    /// Vendor condition group, e.g. "Clear" or "Rain".
    pub condition: String,
    pub humidity: u8,
    /// hPa.
    pub pressure: i64,
    /// m/s.
    pub wind_speed: f64,
    /// Precipitation over the last 3 hours in mm.
    #[serde(rename = "rain", alias = "rain_3h")]
    pub rain_3h: f64,
    pub icon: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCurrencyQuote {
    pub base: String,
    pub last_updated: String,
    /// Always keyed by exactly [`TRACKED_RATE_CODES`].
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Returns `value` trimmed, or `default` when it is absent or blank.
pub fn or_default_param(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weather_serializes_single_canonical_fields() {
        let weather = NormalizedWeather {
            city: "Almaty".into(),
            country: "KZ".into(),
            temperature: 22,
            feels_like: 21,
            description: "clear sky".into(),
            condition: "Clear".into(),
            humidity: 40,
            pressure: 1012,
            wind_speed: 3.1,
            rain_3h: 0.0,
            icon: "01d".into(),
            coordinates: Coordinates { lat: 43.25, lon: 76.95 },
        };

        let value = serde_json::to_value(&weather).unwrap();
        assert_eq!(value["rain"], json!(0.0));
        assert_eq!(value["coordinates"], json!({ "lat": 43.25, "lon": 76.95 }));
        assert!(value.get("windSpeed").is_none());
        assert!(value.get("lat").is_none());
    }

    #[test]
    fn article_without_url_omits_the_field() {
        let article = NormalizedNewsArticle {
            title: "t".into(),
            description: None,
            source: "s".into(),
            published_at: "2024-01-01T00:00:00Z".into(),
            image: None,
            url: None,
        };

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["description"], serde_json::Value::Null);
        assert_eq!(value["publishedAt"], json!("2024-01-01T00:00:00Z"));
        assert!(value.get("url").is_none());
    }

    #[test]
    fn blank_params_fall_back_to_default() {
        assert_eq!(or_default_param(None, DEFAULT_CITY), "Almaty");
        assert_eq!(or_default_param(Some("   "), DEFAULT_CITY), "Almaty");
        assert_eq!(or_default_param(Some(" Paris "), DEFAULT_CITY), "Paris");
    }
}
