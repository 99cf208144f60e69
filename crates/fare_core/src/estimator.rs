//! Fare estimation: turns route metrics and the effective catalog into ranked,
//! explainable fare ranges.
//!
//! Per provider:
//!
//! ```text
//! raw    = (base_fare + km * per_km_rate + min * per_minute_rate) * category_multiplier
//! surged = raw * surge_multiplier(hour)
//! fare   = max(surged, minimum_fare)
//! range  = [floor(fare * 0.95), ceil(fare * 1.15)]
//! ```
//!
//! Estimation is a pure function of its arguments. The reference hour is
//! supplied by the caller (wall clock or a forced rush-hour preview), never
//! read from the system clock here.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::catalog::{ProviderProfile, VehicleCategory};

/// Lower edge of the display band, relative to the point estimate.
pub const RANGE_LOWER_FACTOR: f64 = 0.95;

/// Upper edge of the display band. Wider than the lower edge: traffic only adds cost.
pub const RANGE_UPPER_FACTOR: f64 = 1.15;

/// Morning rush hours, `[start, end)`.
pub const MORNING_RUSH_HOURS: Range<u8> = 6..9;

/// Evening rush hours, `[start, end)`.
pub const EVENING_RUSH_HOURS: Range<u8> = 17..20;

/// Distance and duration of a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteMetrics {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }
}

/// Time-of-day demand window that triggers surge pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurgeWindow {
    MorningRush,
    EveningRush,
}

impl SurgeWindow {
    /// Label shown next to a surged estimate.
    pub fn reason(self) -> &'static str {
        match self {
            Self::MorningRush => "Morning Rush",
            Self::EveningRush => "Evening Rush",
        }
    }

    fn multiplier_for(self, profile: &ProviderProfile) -> f64 {
        match self {
            Self::MorningRush => profile.morning_surge(),
            Self::EveningRush => profile.evening_surge(),
        }
    }
}

/// Surge window active at `hour` (0–23). Morning is checked before evening.
pub fn surge_window_for_hour(hour: u8) -> Option<SurgeWindow> {
    if MORNING_RUSH_HOURS.contains(&hour) {
        Some(SurgeWindow::MorningRush)
    } else if EVENING_RUSH_HOURS.contains(&hour) {
        Some(SurgeWindow::EveningRush)
    } else {
        None
    }
}

/// Ranged estimate for one provider, with the components it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareEstimate {
    pub provider_id: String,
    pub min_estimate: i64,
    pub max_estimate: i64,
    pub surge_applied: bool,
    pub surge_reason: Option<String>,
    /// Base fare after the category multiplier.
    pub base_fare: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub surge_amount: f64,
    pub duration_min: f64,
}

/// Estimate one provider's fare. Ignores `enabled`; see [`estimate_fares`].
pub fn estimate_provider_fare(
    distance_km: f64,
    duration_min: f64,
    provider: &ProviderProfile,
    reference_hour: u8,
    category: VehicleCategory,
) -> FareEstimate {
    let category_multiplier = provider.category_multiplier(category);

    let distance_cost = distance_km * provider.per_km_rate * category_multiplier;
    let time_cost = duration_min * provider.per_minute_rate * category_multiplier;
    let base_fare = provider.base_fare * category_multiplier;
    let raw_fare = base_fare + distance_cost + time_cost;

    let window = surge_window_for_hour(reference_hour);
    let multiplier = window
        .map(|window| window.multiplier_for(provider))
        .unwrap_or(1.0);

    let surge_fare = raw_fare * multiplier;
    let surge_amount = surge_fare - raw_fare;

    let floored_fare = surge_fare.max(provider.minimum_fare);

    FareEstimate {
        provider_id: provider.id.clone(),
        min_estimate: (floored_fare * RANGE_LOWER_FACTOR).floor() as i64,
        max_estimate: (floored_fare * RANGE_UPPER_FACTOR).ceil() as i64,
        surge_applied: multiplier > 1.0,
        surge_reason: window.map(|window| window.reason().to_string()),
        base_fare,
        distance_cost,
        time_cost,
        surge_amount,
        duration_min,
    }
}

/// Estimate every enabled provider and rank the results cheapest first.
///
/// Disabled providers are excluded entirely. Ties on `min_estimate` keep the
/// catalog order, so index 0 is the deterministic "best price".
pub fn estimate_fares(
    distance_km: f64,
    duration_min: f64,
    providers: &[ProviderProfile],
    reference_hour: u8,
    category: VehicleCategory,
) -> Vec<FareEstimate> {
    let mut estimates: Vec<FareEstimate> = providers
        .iter()
        .filter(|provider| provider.enabled)
        .map(|provider| {
            estimate_provider_fare(distance_km, duration_min, provider, reference_hour, category)
        })
        .collect();

    // `sort_by_key` is stable.
    estimates.sort_by_key(|estimate| estimate.min_estimate);
    estimates
}

/// [`estimate_fares`] over a [`RouteMetrics`] value.
pub fn estimate_route(
    route: RouteMetrics,
    providers: &[ProviderProfile],
    reference_hour: u8,
    category: VehicleCategory,
) -> Vec<FareEstimate> {
    estimate_fares(
        route.distance_km,
        route.duration_min,
        providers,
        reference_hour,
        category,
    )
}

/// Cheapest estimate of a ranked list.
pub fn best_price(estimates: &[FareEstimate]) -> Option<&FareEstimate> {
    estimates.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryMultipliers;

    fn reference_provider() -> ProviderProfile {
        ProviderProfile::new("p1", "RIDE")
            .with_rates(100.0, 15.0, 2.0)
            .with_minimum_fare(75.0)
            .with_surge(1.3, 1.4)
    }

    #[test]
    fn morning_rush_applies_surge_and_band() {
        let estimate = estimate_provider_fare(
            10.0,
            20.0,
            &reference_provider(),
            7,
            VehicleCategory::Economy,
        );

        assert_eq!(estimate.min_estimate, 358);
        assert_eq!(estimate.max_estimate, 434);
        assert!(estimate.surge_applied);
        assert_eq!(estimate.surge_reason.as_deref(), Some("Morning Rush"));
        assert!((estimate.surge_amount - 87.0).abs() < 1e-9);
        assert_eq!(estimate.base_fare, 100.0);
        assert_eq!(estimate.distance_cost, 150.0);
        assert_eq!(estimate.time_cost, 40.0);
    }

    #[test]
    fn off_peak_has_no_surge() {
        let estimate = estimate_provider_fare(
            10.0,
            20.0,
            &reference_provider(),
            13,
            VehicleCategory::Economy,
        );

        assert_eq!(estimate.min_estimate, 275);
        assert_eq!(estimate.max_estimate, 334);
        assert!(!estimate.surge_applied);
        assert_eq!(estimate.surge_reason, None);
        assert_eq!(estimate.surge_amount, 0.0);
    }

    #[test]
    fn evening_rush_uses_evening_multiplier() {
        let estimate = estimate_provider_fare(
            10.0,
            20.0,
            &reference_provider(),
            18,
            VehicleCategory::Economy,
        );
        assert_eq!(estimate.surge_reason.as_deref(), Some("Evening Rush"));
        assert!((estimate.surge_amount - 116.0).abs() < 1e-9);
    }

    #[test]
    fn window_edges_are_half_open() {
        assert_eq!(surge_window_for_hour(5), None);
        assert_eq!(surge_window_for_hour(6), Some(SurgeWindow::MorningRush));
        assert_eq!(surge_window_for_hour(8), Some(SurgeWindow::MorningRush));
        assert_eq!(surge_window_for_hour(9), None);
        assert_eq!(surge_window_for_hour(16), None);
        assert_eq!(surge_window_for_hour(17), Some(SurgeWindow::EveningRush));
        assert_eq!(surge_window_for_hour(19), Some(SurgeWindow::EveningRush));
        assert_eq!(surge_window_for_hour(20), None);
    }

    #[test]
    fn minimum_fare_floors_short_trips() {
        let provider = reference_provider().with_minimum_fare(500.0);
        let estimate = estimate_provider_fare(0.0, 0.0, &provider, 12, VehicleCategory::Economy);
        assert_eq!(estimate.min_estimate, 475);
        assert_eq!(estimate.max_estimate, 575);
        assert_eq!(estimate.base_fare, 100.0);
    }

    #[test]
    fn all_zero_profile_yields_zero_range() {
        let provider = ProviderProfile::new("free", "Free");
        let estimate = estimate_provider_fare(12.0, 30.0, &provider, 7, VehicleCategory::Van);
        assert_eq!(estimate.min_estimate, 0);
        assert_eq!(estimate.max_estimate, 0);
    }

    #[test]
    fn category_multiplier_scales_every_component() {
        let provider =
            reference_provider().with_category_multipliers(CategoryMultipliers::new(1.0, 2.0, 3.0));
        let estimate = estimate_provider_fare(10.0, 20.0, &provider, 13, VehicleCategory::Comfort);
        assert_eq!(estimate.base_fare, 200.0);
        assert_eq!(estimate.distance_cost, 300.0);
        assert_eq!(estimate.time_cost, 80.0);
    }

    #[test]
    fn disabled_providers_are_excluded_and_results_ranked() {
        let providers = vec![
            reference_provider(),
            ProviderProfile::new("p2", "Yango").with_rates(50.0, 10.0, 1.0),
            ProviderProfile::new("p3", "Feres")
                .with_rates(10.0, 1.0, 1.0)
                .with_enabled(false),
        ];

        let estimates = estimate_fares(10.0, 20.0, &providers, 13, VehicleCategory::Economy);
        let ids: Vec<_> = estimates.iter().map(|e| e.provider_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert_eq!(best_price(&estimates).map(|e| e.provider_id.as_str()), Some("p2"));
    }
}
