use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    client::{
        ClientError, DashboardApi,
        view::{DashboardView, MapView, Panel, Region},
    },
    model::{DEFAULT_BASE_CURRENCY, DEFAULT_CITY, or_default_param},
};

/// Where one branch of a search ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    /// Never started because weather failed.
    Idle,
    Ready,
    Failed,
    /// Finished after a newer search began; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub search_id: u64,
    pub city: String,
    /// Lower-cased country code taken from the weather result.
    pub country: Option<String>,
    pub weather: BranchState,
    pub news: BranchState,
    pub currency: BranchState,
}

/// Drives one search: weather first, then news and currency concurrently.
///
/// Every search gets an increasing id; updates from a search that is no
/// longer the latest are discarded instead of overwriting newer content.
pub struct Orchestrator<A, V> {
    api: A,
    view: V,
    currency_base: String,
    latest: AtomicU64,
}

impl<A: DashboardApi, V: DashboardView> Orchestrator<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            currency_base: DEFAULT_BASE_CURRENCY.to_string(),
            latest: AtomicU64::new(0),
        }
    }

    pub fn with_currency_base(mut self, base: impl Into<String>) -> Self {
        self.currency_base = base.into();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub async fn search(&self, city: &str) -> SearchReport {
        let search_id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let city = or_default_param(Some(city), DEFAULT_CITY);
        tracing::debug!(search_id, %city, "search started");

        self.publish(search_id, Region::Weather, Panel::Loading);
        self.publish(search_id, Region::News, Panel::Loading);
        self.publish(search_id, Region::Currency, Panel::Loading);

        let mut report = SearchReport {
            search_id,
            city: city.clone(),
            country: None,
            weather: BranchState::Failed,
            news: BranchState::Idle,
            currency: BranchState::Idle,
        };

        let weather = match self.api.weather(&city).await {
            Ok(weather) => weather,
            Err(err) => {
                tracing::warn!(search_id, %city, error = %err, "weather lookup failed");
                // Weather is the root dependency; the other branches never start.
                report.weather = self.settle(
                    search_id,
                    Region::Weather,
                    Panel::Failed(format!("Error: {err}")),
                    BranchState::Failed,
                );
                self.publish(search_id, Region::News, Panel::Idle);
                self.publish(search_id, Region::Currency, Panel::Idle);
                return report;
            }
        };

        let country = weather.country.to_lowercase();
        report.country = Some(country.clone());

        let map = MapView::centered_on(weather.coordinates);
        report.weather = self.settle(search_id, Region::Weather, Panel::Weather(weather), BranchState::Ready);
        self.publish(search_id, Region::Map, Panel::Map(map));

        let (news, currency) = tokio::join!(self.load_news(search_id, &country), self.load_currency(search_id));
        report.news = news;
        report.currency = currency;
        report
    }

    async fn load_news(&self, search_id: u64, country: &str) -> BranchState {
        let outcome = self.api.news(country).await;
        self.settle_branch(search_id, Region::News, outcome.map(Panel::News), "Failed to load news")
    }

    async fn load_currency(&self, search_id: u64) -> BranchState {
        let outcome = self.api.currency(&self.currency_base).await;
        self.settle_branch(
            search_id,
            Region::Currency,
            outcome.map(Panel::Currency),
            "Failed to load currency data",
        )
    }

    fn settle_branch(
        &self,
        search_id: u64,
        region: Region,
        outcome: Result<Panel, ClientError>,
        failure_text: &str,
    ) -> BranchState {
        match outcome {
            Ok(panel) => self.settle(search_id, region, panel, BranchState::Ready),
            Err(err) => {
                tracing::warn!(search_id, ?region, error = %err, "branch failed");
                self.settle(search_id, region, Panel::Failed(failure_text.to_string()), BranchState::Failed)
            }
        }
    }

    fn settle(&self, search_id: u64, region: Region, panel: Panel, state: BranchState) -> BranchState {
        if self.publish(search_id, region, panel) {
            state
        } else {
            BranchState::Superseded
        }
    }

    /// Renders `panel` unless a newer search has started.
    fn publish(&self, search_id: u64, region: Region, panel: Panel) -> bool {
        let latest = self.latest.load(Ordering::SeqCst);
        if latest != search_id {
            tracing::debug!(search_id, latest, ?region, "dropping stale update");
            return false;
        }
        self.view.render(region, panel);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::view::SnapshotView,
        model::{Coordinates, NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather},
    };
    use async_trait::async_trait;
    use std::{
        collections::BTreeMap,
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[derive(Default)]
    struct FakeApi {
        fail_weather: bool,
        fail_news: bool,
        fail_currency: bool,
        slow_city: Option<(&'static str, Duration)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn weather_for(city: &str) -> NormalizedWeather {
        let (country, lat, lon) = match city {
            "Paris" => ("FR", 48.85, 2.35),
            _ => ("KZ", 43.25, 76.95),
        };
        NormalizedWeather {
            city: city.to_string(),
            country: country.to_string(),
            temperature: 20,
            feels_like: 19,
            description: "clear sky".into(),
            condition: "Clear".into(),
            humidity: 40,
            pressure: 1012,
            wind_speed: 3.1,
            rain_3h: 0.0,
            icon: "01d".into(),
            coordinates: Coordinates { lat, lon },
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn weather(&self, city: &str) -> Result<NormalizedWeather, ClientError> {
            self.calls.lock().unwrap().push(format!("weather:{city}"));
            if let Some((slow, delay)) = self.slow_city {
                if slow == city {
                    tokio::time::sleep(delay).await;
                }
            }
            if self.fail_weather {
                return Err(ClientError::Status(404));
            }
            Ok(weather_for(city))
        }

        async fn news(&self, country: &str) -> Result<Vec<NormalizedNewsArticle>, ClientError> {
            self.calls.lock().unwrap().push(format!("news:{country}"));
            if self.fail_news {
                return Err(ClientError::Status(500));
            }
            Ok(vec![NormalizedNewsArticle {
                title: format!("News for {country}"),
                description: None,
                source: "Wire".into(),
                published_at: "2024-05-01T00:00:00Z".into(),
                image: None,
                url: None,
            }])
        }

        async fn currency(&self, base: &str) -> Result<NormalizedCurrencyQuote, ClientError> {
            self.calls.lock().unwrap().push(format!("currency:{base}"));
            if self.fail_currency {
                return Err(ClientError::Transport("connection refused".into()));
            }
            Ok(NormalizedCurrencyQuote {
                base: base.to_string(),
                last_updated: "now".into(),
                rates: BTreeMap::from([("USD".to_string(), 0.002)]),
            })
        }
    }

    fn orchestrator(api: FakeApi) -> Orchestrator<Arc<FakeApi>, SnapshotView> {
        Orchestrator::new(Arc::new(api), SnapshotView::new())
    }

    #[tokio::test]
    async fn happy_path_fills_every_region() {
        let orch = orchestrator(FakeApi::default());

        let report = orch.search("Almaty").await;

        assert_eq!(report.country.as_deref(), Some("kz"));
        assert_eq!(
            (report.weather, report.news, report.currency),
            (BranchState::Ready, BranchState::Ready, BranchState::Ready)
        );
        assert!(matches!(orch.view().panel(Region::Weather), Panel::Weather(w) if w.city == "Almaty"));
        match orch.view().panel(Region::Map) {
            Panel::Map(map) => {
                assert_eq!(map.center, Coordinates { lat: 43.25, lon: 76.95 });
                assert_eq!(map.zoom, 10);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(orch.view().panel(Region::News), Panel::News(n) if n[0].title == "News for kz"));
        assert!(matches!(orch.view().panel(Region::Currency), Panel::Currency(c) if c.base == "KZT"));

        let calls = orch.api.calls();
        assert_eq!(calls[0], "weather:Almaty");
        assert!(calls.contains(&"news:kz".to_string()));
        assert!(calls.contains(&"currency:KZT".to_string()));
    }

    #[tokio::test]
    async fn blank_city_uses_default() {
        let orch = orchestrator(FakeApi::default());

        let report = orch.search("   ").await;
        assert_eq!(report.city, "Almaty");
    }

    #[tokio::test]
    async fn weather_failure_is_terminal() {
        let orch = orchestrator(FakeApi {
            fail_weather: true,
            ..FakeApi::default()
        });

        let report = orch.search("Atlantis").await;

        assert_eq!(report.weather, BranchState::Failed);
        assert_eq!(report.news, BranchState::Idle);
        assert_eq!(report.currency, BranchState::Idle);
        assert_eq!(
            orch.view().panel(Region::Weather),
            Panel::Failed("Error: HTTP error! status: 404".into())
        );
        assert_eq!(orch.view().panel(Region::News), Panel::Idle);
        assert_eq!(orch.view().panel(Region::Currency), Panel::Idle);
        assert_eq!(orch.api.calls(), ["weather:Atlantis"]);
    }

    #[tokio::test]
    async fn branch_failures_stay_in_their_region() {
        let orch = orchestrator(FakeApi {
            fail_news: true,
            ..FakeApi::default()
        });

        let report = orch.search("Almaty").await;

        assert_eq!(report.news, BranchState::Failed);
        assert_eq!(report.currency, BranchState::Ready);
        assert_eq!(orch.view().panel(Region::News), Panel::Failed("Failed to load news".into()));
        assert!(matches!(orch.view().panel(Region::Weather), Panel::Weather(_)));
        assert!(matches!(orch.view().panel(Region::Currency), Panel::Currency(_)));

        let orch = orchestrator(FakeApi {
            fail_currency: true,
            ..FakeApi::default()
        });

        let report = orch.search("Almaty").await;
        assert_eq!(report.news, BranchState::Ready);
        assert_eq!(report.currency, BranchState::Failed);
        assert_eq!(
            orch.view().panel(Region::Currency),
            Panel::Failed("Failed to load currency data".into())
        );
    }

    #[tokio::test]
    async fn stale_search_never_overwrites_newer_one() {
        let orch = orchestrator(FakeApi {
            slow_city: Some(("Slowtown", Duration::from_millis(200))),
            ..FakeApi::default()
        });

        let (stale, fresh) = tokio::join!(orch.search("Slowtown"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            orch.search("Paris").await
        });

        assert_eq!(stale.weather, BranchState::Superseded);
        assert_eq!(stale.news, BranchState::Superseded);
        assert_eq!(stale.currency, BranchState::Superseded);
        assert_eq!(fresh.weather, BranchState::Ready);
        assert!(matches!(orch.view().panel(Region::Weather), Panel::Weather(w) if w.city == "Paris"));
        assert!(matches!(orch.view().panel(Region::News), Panel::News(n) if n[0].title == "News for fr"));
    }
}
