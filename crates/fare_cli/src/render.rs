use std::fmt::Write;

use anyhow::{Context, Result};
use fare_core::catalog::{find_profile, ProviderProfile, VehicleCategory};
use fare_core::comparison::TripComparison;
use serde::Serialize;

#[derive(Serialize)]
struct ComparisonOutput<'a> {
    #[serde(flatten)]
    comparison: &'a TripComparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_message: Option<&'a str>,
}

pub(crate) fn comparison_json(comparison: &TripComparison, share: Option<&str>) -> Result<String> {
    serde_json::to_string_pretty(&ComparisonOutput {
        comparison,
        share_message: share,
    })
    .context("failed to serialize comparison")
}

pub(crate) fn comparison_table(
    comparison: &TripComparison,
    catalog: &[ProviderProfile],
    hour: u8,
    category: VehicleCategory,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:.1} km, {:.0} min  ({category}, {hour:02}:00)",
        comparison.route.distance_km, comparison.route.duration_min
    );
    let _ = writeln!(
        out,
        "{:<3} {:<10} {:>15} {:>8}  {}",
        "#", "PROVIDER", "FARE (ETB)", "PICKUP", "SURGE"
    );

    for (rank, estimate) in comparison.estimates.iter().enumerate() {
        let profile = find_profile(catalog, &estimate.provider_id);
        let name = profile
            .map(|profile| profile.display_name.as_str())
            .unwrap_or(estimate.provider_id.as_str());
        let pickup = profile
            .map(|profile| format!("{:.0} min", profile.pickup_delay_minutes))
            .unwrap_or_default();
        let fare = format!("{}-{}", estimate.min_estimate, estimate.max_estimate);
        let surge = match (&estimate.surge_reason, estimate.surge_applied) {
            (Some(reason), true) => format!("{reason} (+{:.0})", estimate.surge_amount),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{:<3} {:<10} {:>15} {:>8}  {}",
            rank + 1,
            name,
            fare,
            pickup,
            surge
        );
    }
    out
}

pub(crate) fn catalog_table(catalog: &[ProviderProfile]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<8} {:>6} {:>6} {:>6} {:>6} {:>8} {:>8} {:>17}  {}",
        "ID", "NAME", "BASE", "/KM", "/MIN", "MIN", "AM SURGE", "PM SURGE", "ECO/COMFORT/VAN", "ON"
    );
    for profile in catalog {
        let categories = VehicleCategory::ALL
            .iter()
            .map(|category| format!("{:.2}", profile.category_multiplier(*category)))
            .collect::<Vec<_>>()
            .join("/");
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>8.2} {:>8.2} {:>17}  {}",
            profile.id,
            profile.display_name,
            profile.base_fare,
            profile.per_km_rate,
            profile.per_minute_rate,
            profile.minimum_fare,
            profile.morning_surge(),
            profile.evening_surge(),
            categories,
            if profile.enabled { "yes" } else { "no" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fare_core::catalog::default_catalog;
    use fare_core::comparison::{compare_trip, TripRequest};
    use fare_core::test_helpers::{test_destination, test_origin, FixedRouteProvider};

    fn comparison(hour: u8) -> TripComparison {
        let router = FixedRouteProvider::new(10.0, 20.0);
        compare_trip(
            &router,
            &default_catalog(),
            &TripRequest::new(test_origin(), test_destination()).with_reference_hour(hour),
        )
        .expect("fixed route")
    }

    #[test]
    fn table_lists_providers_cheapest_first() {
        let catalog = default_catalog();
        let comparison = comparison(7);
        let table = comparison_table(&comparison, &catalog, 7, VehicleCategory::Economy);

        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2 + comparison.estimates.len());
        assert!(lines[0].starts_with("10.0 km, 20 min"));
        assert!(lines[2].starts_with("1 "));
        assert!(table.contains("Morning Rush"));
    }

    #[test]
    fn json_includes_share_message() {
        let comparison = comparison(13);
        let json = comparison_json(&comparison, Some("Cheapest ride")).expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["share_message"], "Cheapest ride");
        assert_eq!(value["estimates"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["route"]["distance_km"], 10.0);
    }

    #[test]
    fn catalog_table_has_a_row_per_provider() {
        let table = catalog_table(&default_catalog());
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("Yango"));
    }
}
