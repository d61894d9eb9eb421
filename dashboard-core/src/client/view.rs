use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::model::{Coordinates, NormalizedCurrencyQuote, NormalizedNewsArticle, NormalizedWeather};

/// Zoom level the map widget is centered with.
pub const MAP_ZOOM: u8 = 10;

/// Disjoint display regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Weather,
    Map,
    News,
    Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub popup: String,
}

impl MapView {
    pub fn centered_on(coordinates: Coordinates) -> Self {
        Self {
            center: coordinates,
            zoom: MAP_ZOOM,
            popup: format!("Latitude: {}\nLongitude: {}", coordinates.lat, coordinates.lon),
        }
    }
}

/// Content of one region.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Idle,
    Loading,
    Weather(NormalizedWeather),
    Map(MapView),
    News(Vec<NormalizedNewsArticle>),
    Currency(NormalizedCurrencyQuote),
    /// Inline, user-facing error text.
    Failed(String),
}

/// Rendering seam. Implementations only format data; they make no decisions.
pub trait DashboardView: Send + Sync {
    fn render(&self, region: Region, panel: Panel);
}

/// Keeps the latest panel per region.
#[derive(Debug, Default)]
pub struct SnapshotView {
    panels: Mutex<HashMap<Region, Panel>>,
}

impl SnapshotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, region: Region) -> Panel {
        self.panels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&region)
            .cloned()
            .unwrap_or(Panel::Idle)
    }
}

impl DashboardView for SnapshotView {
    fn render(&self, region: Region, panel: Panel) {
        self.panels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(region, panel);
    }
}

impl<V: DashboardView + ?Sized> DashboardView for std::sync::Arc<V> {
    fn render(&self, region: Region, panel: Panel) {
        (**self).render(region, panel);
    }
}
