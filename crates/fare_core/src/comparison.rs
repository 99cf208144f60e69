//! One comparison request end to end: route the trip, then price it with every
//! enabled provider.

use h3o::LatLng;
use serde::Serialize;

use crate::catalog::{find_profile, ProviderProfile, VehicleCategory};
use crate::estimator::{best_price, estimate_route, FareEstimate};
use crate::routing::{RouteError, RouteProvider, RouteResult};

/// Hour used to preview evening-rush prices regardless of the clock.
pub const RUSH_HOUR_PREVIEW: u8 = 18;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    /// Local hour of day, 0–23.
    pub reference_hour: u8,
    pub category: VehicleCategory,
}

impl TripRequest {
    /// Economy, priced at noon.
    pub fn new(origin: LatLng, destination: LatLng) -> Self {
        Self {
            origin,
            destination,
            reference_hour: 12,
            category: VehicleCategory::default(),
        }
    }

    pub fn with_reference_hour(mut self, hour: u8) -> Self {
        self.reference_hour = hour;
        self
    }

    pub fn with_category(mut self, category: VehicleCategory) -> Self {
        self.category = category;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripComparison {
    pub route: RouteResult,
    /// Cheapest first.
    pub estimates: Vec<FareEstimate>,
}

impl TripComparison {
    pub fn best(&self) -> Option<&FareEstimate> {
        best_price(&self.estimates)
    }

    /// Text for sharing the cheapest option, or `None` when nothing was priced.
    pub fn share_message(
        &self,
        origin_label: &str,
        destination_label: &str,
        catalog: &[ProviderProfile],
    ) -> Option<String> {
        let best = self.best()?;
        let name = find_profile(catalog, &best.provider_id)
            .map(|profile| profile.display_name.as_str())
            .unwrap_or(best.provider_id.as_str());
        Some(format!(
            "Cheapest ride from {origin_label} to {destination_label}: {name} at {}–{} ETB",
            best.min_estimate, best.max_estimate
        ))
    }
}

/// Route the trip and estimate every enabled provider in `catalog`.
///
/// A routing failure is returned as-is; nothing is priced without a route.
pub fn compare_trip(
    router: &dyn RouteProvider,
    catalog: &[ProviderProfile],
    request: &TripRequest,
) -> Result<TripComparison, RouteError> {
    let route = router.route(request.origin, request.destination)?;
    let estimates = estimate_route(
        route.metrics(),
        catalog,
        request.reference_hour,
        request.category,
    );

    if let Some(best) = best_price(&estimates) {
        tracing::info!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            providers = estimates.len(),
            best = %best.provider_id,
            min = best.min_estimate,
            max = best.max_estimate,
            "trip compared"
        );
    }

    Ok(TripComparison { route, estimates })
}
