//! Ride-fare comparison for Addis Ababa.
//!
//! Given a routed trip (distance and duration), every enabled provider in the
//! effective catalog is priced with the same formula and the results are ranked
//! cheapest first. Around that core sit the collaborators a full application
//! needs: route providers and geocoders, a static place table, a local store for
//! calibration, favourites and recent searches, and booking hand-off links.

pub mod booking;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod estimator;
pub mod locations;
pub mod routing;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use catalog::{
    default_catalog, load_effective_catalog, CatalogError, ProviderProfile, VehicleCategory,
};
pub use comparison::{compare_trip, TripComparison, TripRequest};
pub use config::AppConfig;
pub use estimator::{estimate_fares, FareEstimate, RouteMetrics};
pub use routing::{RouteError, RouteProvider};
pub use store::StoreError;
