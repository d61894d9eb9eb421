use std::fmt::Write as _;

use dashboard_core::{
    NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather,
    client::{DashboardView, MapView, Panel, Region},
};

/// Prints each settled panel to stdout as it arrives.
#[derive(Debug, Default)]
pub struct TerminalView;

impl DashboardView for TerminalView {
    fn render(&self, region: Region, panel: Panel) {
        if let Some(text) = format_panel(region, &panel) {
            println!("{text}");
        }
    }
}

/// `None` for transient states that are not worth printing.
pub fn format_panel(region: Region, panel: &Panel) -> Option<String> {
    let body = match panel {
        Panel::Idle | Panel::Loading => return None,
        Panel::Weather(weather) => format_weather(weather),
        Panel::Map(map) => format_map(map),
        Panel::News(articles) => format_news(articles),
        Panel::Currency(quote) => format_currency(quote),
        Panel::Failed(message) => format!("  {message}\n"),
    };
    Some(format!("== {} ==\n{body}", title(region)))
}

fn title(region: Region) -> &'static str {
    match region {
        Region::Weather => "Weather",
        Region::Map => "Map",
        Region::News => "News",
        Region::Currency => "Exchange rates",
    }
}

pub fn format_weather(w: &NormalizedWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Location:    {}, {}", w.city, w.country);
    let _ = writeln!(out, "  Temperature: {}°C (feels like {}°C)", w.temperature, w.feels_like);
    let _ = writeln!(out, "  Condition:   {} [{}]", w.description, w.icon);
    let _ = writeln!(out, "  Humidity:    {}%", w.humidity);
    let _ = writeln!(out, "  Pressure:    {} hPa", w.pressure);
    let _ = writeln!(out, "  Wind speed:  {} m/s", w.wind_speed);
    let _ = writeln!(out, "  Rain (3h):   {} mm", w.rain_3h);
    out
}

pub fn format_map(map: &MapView) -> String {
    format!(
        "  Center: {}, {} (zoom {})\n  {}\n",
        map.center.lat,
        map.center.lon,
        map.zoom,
        map.popup.replace('\n', ", ")
    )
}

pub fn format_news(articles: &[NormalizedNewsArticle]) -> String {
    if articles.is_empty() {
        return "  No news available for this country\n".to_string();
    }

    let mut out = String::new();
    for article in articles {
        let _ = writeln!(out, "  * {}", article.title);
        if let Some(description) = &article.description {
            let _ = writeln!(out, "    {description}");
        }
        let _ = writeln!(out, "    Source: {} | {}", article.source, article.published_at);
        if let Some(url) = &article.url {
            let _ = writeln!(out, "    {url}");
        }
    }
    out
}

pub fn format_currency(quote: &NormalizedCurrencyQuote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Base currency: {}", quote.base);
    let _ = writeln!(out, "  Last updated:  {}", quote.last_updated);
    for (code, rate) in &quote.rates {
        let _ = writeln!(out, "  {code}: {rate:.4}");
    }
    out
}
