//! Compare default providers for a trip across the day using straight-line routing.
//!
//! Run with: cargo run -p fare_core --example compare_trip

use fare_core::catalog::{default_catalog, find_profile, VehicleCategory};
use fare_core::comparison::{compare_trip, TripRequest};
use fare_core::locations::{resolve_endpoint, TripEnd};
use fare_core::routing::StraightLineRouteProvider;

fn main() {
    const PICKUP: &str = "Piassa (Piazza)";
    const DROPOFF: &str = "Bole International Airport";
    const HOURS: [u8; 4] = [7, 12, 18, 22];

    let router = StraightLineRouteProvider::default();
    let catalog = default_catalog();
    let origin = resolve_endpoint(PICKUP, None, TripEnd::Pickup);
    let destination = resolve_endpoint(DROPOFF, None, TripEnd::Dropoff);

    println!("--- {PICKUP} -> {DROPOFF} ---");
    for hour in HOURS {
        let request = TripRequest::new(origin, destination)
            .with_reference_hour(hour)
            .with_category(VehicleCategory::Economy);
        let comparison = match compare_trip(&router, &catalog, &request) {
            Ok(comparison) => comparison,
            Err(error) => {
                eprintln!("routing failed: {error}");
                return;
            }
        };

        println!(
            "\n{hour:02}:00  {:.1} km, {:.0} min",
            comparison.route.distance_km, comparison.route.duration_min
        );
        for estimate in &comparison.estimates {
            let name = find_profile(&catalog, &estimate.provider_id)
                .map(|profile| profile.display_name.as_str())
                .unwrap_or(estimate.provider_id.as_str());
            println!(
                "  {name:<8} {:>5} - {:<5} ETB  {}",
                estimate.min_estimate,
                estimate.max_estimate,
                estimate.surge_reason.as_deref().unwrap_or("")
            );
        }
        if let Some(message) = comparison.share_message(PICKUP, DROPOFF, &catalog) {
            println!("  {message}");
        }
    }
}
