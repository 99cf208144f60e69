//! Shared fixtures for unit tests, integration tests and benchmarks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use h3o::LatLng;

use crate::catalog::{CategoryMultipliers, ProviderProfile};
use crate::routing::{RouteError, RouteProvider, RouteResult};

/// Mexico Square.
pub const TEST_ORIGIN: (f64, f64) = (9.0103, 38.7454);

/// Bole International Airport.
pub const TEST_DESTINATION: (f64, f64) = (8.9778, 38.7993);

/// # Panics
///
/// Panics if the constant is not a valid coordinate (should never happen).
pub fn test_origin() -> LatLng {
    LatLng::new(TEST_ORIGIN.0, TEST_ORIGIN.1).expect("TEST_ORIGIN should be a valid coordinate")
}

/// # Panics
///
/// Panics if the constant is not a valid coordinate (should never happen).
pub fn test_destination() -> LatLng {
    LatLng::new(TEST_DESTINATION.0, TEST_DESTINATION.1)
        .expect("TEST_DESTINATION should be a valid coordinate")
}

/// Base 100, 15/km, 2/min, minimum 75, surges 1.3 / 1.4, no category table.
///
/// 10 km / 20 min prices at 275–334 off-peak and 358–434 in the morning rush.
pub fn reference_profile(id: &str) -> ProviderProfile {
    ProviderProfile::new(id, id.to_uppercase())
        .with_rates(100.0, 15.0, 2.0)
        .with_minimum_fare(75.0)
        .with_surge(1.3, 1.4)
}

/// Three providers with distinct prices: `cheap`, `mid`, `premium`.
pub fn tiered_catalog() -> Vec<ProviderProfile> {
    vec![
        ProviderProfile::new("premium", "Premium")
            .with_rates(150.0, 20.0, 3.0)
            .with_minimum_fare(120.0)
            .with_category_multipliers(CategoryMultipliers::new(1.0, 1.5, 2.0)),
        ProviderProfile::new("cheap", "Cheap")
            .with_rates(60.0, 10.0, 1.0)
            .with_minimum_fare(50.0),
        reference_profile("mid"),
    ]
}

/// Route provider returning a fixed result and counting calls.
#[derive(Debug, Clone)]
pub struct FixedRouteProvider {
    result: Result<RouteResult, RouteError>,
    calls: Arc<AtomicUsize>,
}

impl FixedRouteProvider {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            result: Ok(RouteResult {
                distance_km,
                duration_min,
                polyline: None,
            }),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: RouteError) -> Self {
        Self {
            result: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter; clones observe the same calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl RouteProvider for FixedRouteProvider {
    fn route(&self, _origin: LatLng, _destination: LatLng) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
