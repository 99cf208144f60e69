//! Routing and geocoding collaborators.
//!
//! Route providers return distance/duration for a trip; the estimator only
//! runs once one of them has succeeded. Implementations:
//!
//! - **`StraightLineRouteProvider`**: haversine distance at an average city speed. No I/O.
//! - **`OrsClient`** (feature `ors`): OpenRouteService directions + geocoding over HTTP.
//! - **`RetryingRouteProvider`**: exponential backoff around any provider.
//! - **`CachedRouteProvider`**: TTL-bounded LRU cache with optional straight-line fallback.
//!
//! [`build_route_provider`] assembles the stack from a [`RouteProviderKind`].

use h3o::LatLng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::estimator::RouteMetrics;
use crate::locations::search_static_locations;

mod cache;
mod retry;

#[cfg(feature = "ors")]
pub mod ors;

pub use cache::{CachedRouteProvider, DEFAULT_ROUTE_CACHE_CAPACITY, DEFAULT_ROUTE_CACHE_TTL};
pub use retry::{RetryPolicy, RetryingRouteProvider};

/// Average urban speed used when no road network is available.
pub const DEFAULT_CITY_SPEED_KMH: f64 = 40.0;

pub const DEFAULT_ORS_ENDPOINT: &str = "https://api.openrouteservice.org";

const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Result of a route query between two coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Road-network distance in kilometres, one decimal.
    pub distance_km: f64,
    /// Travel time in whole minutes, rounded up.
    pub duration_min: f64,
    /// Encoded route geometry, when the backend returns one.
    pub polyline: Option<String>,
}

impl RouteResult {
    pub fn metrics(&self) -> RouteMetrics {
        RouteMetrics::new(self.distance_km, self.duration_min)
    }
}

/// Where a location candidate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Remote,
    Static,
}

/// A geocoding match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub source: CandidateSource,
}

impl LocationCandidate {
    pub fn coordinate(&self) -> Result<LatLng, RouteError> {
        LatLng::new(self.lat, self.lng)
            .map_err(|err| RouteError::InvalidCoordinates(err.to_string()))
    }
}

/// Failures of the routing collaborator. All are recoverable from the caller's side.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("routing request timed out")]
    Timeout,
    #[error("routing API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("invalid routing response: {0}")]
    InvalidResponse(String),
    #[error("no route found between the requested points")]
    NoRoute,
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

impl RouteError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidResponse(_) | Self::NoRoute | Self::InvalidCoordinates(_) => false,
        }
    }
}

/// Routing backend. Must be `Send + Sync` so one instance can serve a whole session.
pub trait RouteProvider: Send + Sync {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError>;
}

/// Free-text place search.
pub trait Geocoder: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, RouteError>;
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError> {
        (**self).route(origin, destination)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Box<T> {
    fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, RouteError> {
        (**self).search(query)
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let (lat1, lon1) = (a.lat().to_radians(), a.lng().to_radians());
    let (lat2, lon2) = (b.lat().to_radians(), b.lng().to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round metres/seconds the way routes are displayed: km to one decimal, minutes up.
pub(crate) fn round_route(distance_m: f64, duration_secs: f64) -> (f64, f64) {
    let distance_km = (distance_m / 1000.0 * 10.0).round() / 10.0;
    let duration_min = (duration_secs / 60.0).ceil();
    (distance_km, duration_min)
}

// ---------------------------------------------------------------------------
// Straight-line provider (always available)
// ---------------------------------------------------------------------------

/// Haversine distance with a constant average speed. Used offline and as a fallback.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineRouteProvider {
    average_speed_kmh: f64,
}

impl StraightLineRouteProvider {
    pub fn new(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }
}

impl Default for StraightLineRouteProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CITY_SPEED_KMH)
    }
}

impl RouteProvider for StraightLineRouteProvider {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError> {
        let distance_km = haversine_km(origin, destination);
        let duration_secs = if distance_km > 0.0 && self.average_speed_kmh > 0.0 {
            (distance_km / self.average_speed_kmh) * 3600.0
        } else {
            0.0
        };
        let (distance_km, duration_min) = round_route(distance_km * 1000.0, duration_secs);
        Ok(RouteResult {
            distance_km,
            duration_min,
            polyline: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Geocoders
// ---------------------------------------------------------------------------

/// Searches the built-in Addis Ababa place table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGeocoder;

impl Geocoder for StaticGeocoder {
    fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, RouteError> {
        Ok(search_static_locations(query)
            .into_iter()
            .map(|place| LocationCandidate {
                name: place.name.to_string(),
                lat: place.lat,
                lng: place.lng,
                source: CandidateSource::Static,
            })
            .collect())
    }
}

/// Remote matches first, then static ones. A failing remote search degrades to static only.
pub struct CombinedGeocoder {
    remote: Box<dyn Geocoder>,
}

impl CombinedGeocoder {
    pub fn new(remote: Box<dyn Geocoder>) -> Self {
        Self { remote }
    }
}

impl Geocoder for CombinedGeocoder {
    fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, RouteError> {
        let mut combined = match self.remote.search(query) {
            Ok(matches) => matches,
            Err(error) => {
                tracing::warn!(%error, query, "remote geocoding failed, using static places only");
                Vec::new()
            }
        };
        combined.extend(StaticGeocoder.search(query)?);
        Ok(combined)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Which routing backend to use.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum RouteProviderKind {
    /// Haversine estimate, no network.
    #[default]
    StraightLine,
    /// OpenRouteService HTTP API.
    #[cfg(feature = "ors")]
    Ors { endpoint: String, api_key: String },
}

/// Cache and retry settings for [`build_route_provider`].
#[derive(Clone, Debug)]
pub struct RoutingConfig {
    pub kind: RouteProviderKind,
    pub cache_capacity: usize,
    pub cache_ttl: std::time::Duration,
    pub retry: RetryPolicy,
    /// Fall back to a straight-line estimate when the backend keeps failing.
    pub straight_line_fallback: bool,
}

/// Construct the route provider stack for `config`.
///
/// - `StraightLine` is returned bare; it is cheap and cannot fail.
/// - `Ors` is wrapped in retries, then in a TTL cache (with optional straight-line fallback).
pub fn build_route_provider(config: &RoutingConfig) -> Box<dyn RouteProvider> {
    match &config.kind {
        RouteProviderKind::StraightLine => Box::new(StraightLineRouteProvider::default()),

        #[cfg(feature = "ors")]
        RouteProviderKind::Ors { endpoint, api_key } => match ors::OrsClient::new(endpoint, api_key) {
            Ok(client) => {
                let retrying = RetryingRouteProvider::new(Box::new(client), config.retry.clone());
                Box::new(CachedRouteProvider::new(
                    Box::new(retrying),
                    config.cache_capacity,
                    config.cache_ttl,
                    config.straight_line_fallback,
                ))
            }
            Err(error) => {
                tracing::warn!(%error, "failed to build ORS client, falling back to straight-line routing");
                Box::new(StraightLineRouteProvider::default())
            }
        },
    }
}

/// Construct the geocoder for `kind`: static table, or remote merged with static.
pub fn build_geocoder(kind: &RouteProviderKind) -> Box<dyn Geocoder> {
    match kind {
        RouteProviderKind::StraightLine => Box::new(StaticGeocoder),

        #[cfg(feature = "ors")]
        RouteProviderKind::Ors { endpoint, api_key } => match ors::OrsClient::new(endpoint, api_key) {
            Ok(client) => Box::new(CombinedGeocoder::new(Box::new(client))),
            Err(error) => {
                tracing::warn!(%error, "failed to build ORS client, using static places only");
                Box::new(StaticGeocoder)
            }
        },
    }
}
