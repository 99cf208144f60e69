#![allow(dead_code)]

use fare_core::catalog::{CategoryMultipliers, ProviderProfile};
use fare_core::estimator::FareEstimate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const PROPERTY_SEED: u64 = 0x00fa_2e5e_ed00;
pub const PROPERTY_CASES: usize = 500;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(PROPERTY_SEED)
}

/// A valid profile with rates in realistic ranges. Surges may be absent or
/// non-positive so the fallback path is exercised too.
pub fn random_profile<R: Rng>(rng: &mut R, id: &str) -> ProviderProfile {
    let mut profile = ProviderProfile::new(id, id)
        .with_rates(
            rng.gen_range(0.0..200.0),
            rng.gen_range(0.0..30.0),
            rng.gen_range(0.0..5.0),
        )
        .with_minimum_fare(rng.gen_range(0.0..150.0))
        .with_enabled(rng.gen_bool(0.8));

    profile.morning_surge_multiplier = random_surge(rng);
    profile.evening_surge_multiplier = random_surge(rng);
    if rng.gen_bool(0.5) {
        profile.category_multipliers = Some(CategoryMultipliers::new(
            1.0,
            rng.gen_range(1.0..2.0),
            rng.gen_range(1.0..3.0),
        ));
    }
    profile
}

fn random_surge<R: Rng>(rng: &mut R) -> Option<f64> {
    match rng.gen_range(0..4) {
        0 => None,
        1 => Some(0.0),
        _ => Some(rng.gen_range(1.0..2.5)),
    }
}

pub fn random_catalog<R: Rng>(rng: &mut R, size: usize) -> Vec<ProviderProfile> {
    (0..size)
        .map(|i| random_profile(rng, &format!("p{i}")))
        .collect()
}

pub fn assert_ranked(estimates: &[FareEstimate]) {
    assert!(
        estimates
            .windows(2)
            .all(|pair| pair[0].min_estimate <= pair[1].min_estimate),
        "estimates not sorted by min_estimate: {:?}",
        estimates
            .iter()
            .map(|estimate| (estimate.provider_id.as_str(), estimate.min_estimate))
            .collect::<Vec<_>>()
    );
}

pub fn provider_ids(estimates: &[FareEstimate]) -> Vec<&str> {
    estimates
        .iter()
        .map(|estimate| estimate.provider_id.as_str())
        .collect()
}
