use anyhow::{bail, Context, Result};
use chrono::{Local, Timelike, Utc};
use fare_core::booking::{booking_targets, Platform};
use fare_core::catalog::{
    apply_calibration_edit, default_catalog, load_effective_catalog, CalibrationEdit,
    ProviderProfile, VehicleCategory,
};
use fare_core::comparison::{compare_trip, TripRequest, RUSH_HOUR_PREVIEW};
use fare_core::locations::{resolve_endpoint, TripEnd};
use fare_core::routing::{build_geocoder, build_route_provider};
use fare_core::store::{self, RemoveFavoriteOutcome, StoreError};
use fare_core::AppConfig;
use h3o::LatLng;

use crate::render;

pub(crate) struct EstimateArgs {
    pub(crate) pickup: String,
    pub(crate) dropoff: String,
    pub(crate) from_coords: Option<LatLng>,
    pub(crate) to_coords: Option<LatLng>,
    pub(crate) hour: Option<u8>,
    pub(crate) rush_hour: bool,
    pub(crate) category: VehicleCategory,
    pub(crate) json: bool,
    pub(crate) record_history: bool,
}

/// Defaults merged with stored calibration. An unreadable store falls back to
/// the defaults.
fn effective_catalog(config: &AppConfig) -> Result<Vec<ProviderProfile>> {
    let defaults = default_catalog();
    let stored = match store::load_calibration(&config.store_path(), &defaults) {
        Ok(stored) => stored,
        Err(StoreError::InvalidFormat(message)) => {
            tracing::warn!(%message, "ignoring unreadable calibration");
            None
        }
        Err(error) => return Err(error).context("failed to load calibration"),
    };
    Ok(load_effective_catalog(&defaults, stored.as_deref()))
}

fn reference_hour(args: &EstimateArgs) -> u8 {
    if args.rush_hour {
        return RUSH_HOUR_PREVIEW;
    }
    // hour() is always below 24.
    args.hour.unwrap_or_else(|| Local::now().hour() as u8)
}

pub(crate) fn estimate(config: &AppConfig, args: EstimateArgs) -> Result<()> {
    let catalog = effective_catalog(config)?;
    if !catalog.iter().any(|profile| profile.enabled) {
        bail!("every provider is disabled; enable one with `calibrate enable <id>`");
    }

    let origin = resolve_endpoint(&args.pickup, args.from_coords, TripEnd::Pickup);
    let destination = resolve_endpoint(&args.dropoff, args.to_coords, TripEnd::Dropoff);
    let request = TripRequest::new(origin, destination)
        .with_reference_hour(reference_hour(&args))
        .with_category(args.category);

    let router = build_route_provider(&config.routing_config());
    let comparison = compare_trip(router.as_ref(), &catalog, &request).with_context(|| {
        format!("failed to route {} -> {}", args.pickup, args.dropoff)
    })?;

    if args.record_history {
        if let Err(error) =
            store::push_recent_search(&config.store_path(), &args.pickup, &args.dropoff, Utc::now())
        {
            tracing::warn!(%error, "failed to record recent search");
        }
    }

    let share = comparison.share_message(&args.pickup, &args.dropoff, &catalog);
    if args.json {
        println!("{}", render::comparison_json(&comparison, share.as_deref())?);
    } else {
        print!(
            "{}",
            render::comparison_table(&comparison, &catalog, request.reference_hour, request.category)
        );
        if let Some(share) = share {
            println!("\n{share}");
        }
    }
    Ok(())
}

pub(crate) fn providers(config: &AppConfig, json: bool) -> Result<()> {
    let catalog = effective_catalog(config)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&catalog).context("failed to serialize catalog")?
        );
    } else {
        print!("{}", render::catalog_table(&catalog));
    }
    Ok(())
}

pub(crate) fn calibrate(config: &AppConfig, edit: CalibrationEdit) -> Result<()> {
    let mut catalog = effective_catalog(config)?;
    apply_calibration_edit(&mut catalog, &edit).context("calibration rejected")?;
    store::save_calibration(&config.store_path(), &catalog)
        .context("failed to save calibration")?;

    tracing::info!(?edit, "calibration saved");
    print!("{}", render::catalog_table(&catalog));
    Ok(())
}

pub(crate) fn reset_calibration(config: &AppConfig) -> Result<()> {
    store::clear_calibration(&config.store_path()).context("failed to clear calibration")?;
    println!("Calibration cleared; default rates apply.");
    Ok(())
}

pub(crate) fn search(config: &AppConfig, query: &str) -> Result<()> {
    let geocoder = build_geocoder(&config.route_provider_kind());
    let matches = geocoder
        .search(query)
        .with_context(|| format!("failed to search for '{query}'"))?;
    if matches.is_empty() {
        println!("No places match '{query}'.");
        return Ok(());
    }
    for candidate in matches {
        println!(
            "{:<40} {:>9.4} {:>9.4}  ({:?})",
            candidate.name, candidate.lat, candidate.lng, candidate.source
        );
    }
    Ok(())
}

pub(crate) fn recents(config: &AppConfig) -> Result<()> {
    let recents = store::load_recent_searches(&config.store_path())
        .context("failed to load recent searches")?;
    if recents.is_empty() {
        println!("No recent searches.");
    }
    for search in recents {
        println!(
            "{}  {} -> {}",
            search.searched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            search.pickup,
            search.dropoff
        );
    }
    Ok(())
}

pub(crate) fn list_favorites(config: &AppConfig) -> Result<()> {
    let favorites =
        store::load_favorites(&config.store_path()).context("failed to load favourites")?;
    for favorite in favorites {
        println!(
            "{:<14} {:<10} {} -> {}",
            favorite.id, favorite.label, favorite.pickup, favorite.dropoff
        );
    }
    Ok(())
}

pub(crate) fn add_favorite(
    config: &AppConfig,
    label: &str,
    pickup: &str,
    dropoff: &str,
    icon: &str,
) -> Result<()> {
    let favorite = store::add_favorite(&config.store_path(), label, pickup, dropoff, icon, Utc::now())
        .context("failed to save favourite")?;
    println!("Saved favourite {} ({})", favorite.label, favorite.id);
    Ok(())
}

pub(crate) fn remove_favorite(config: &AppConfig, id: &str) -> Result<()> {
    match store::remove_favorite(&config.store_path(), id).context("failed to remove favourite")? {
        RemoveFavoriteOutcome::Removed => println!("Removed favourite {id}"),
        RemoveFavoriteOutcome::NotFound => bail!("no favourite with id '{id}'"),
    }
    Ok(())
}

pub(crate) fn book(provider_id: &str, platform: Platform, app_installed: bool) -> Result<()> {
    let Some(targets) = booking_targets(provider_id, platform, app_installed) else {
        bail!("no booking links for provider '{provider_id}'");
    };
    for target in targets {
        println!("{target}");
    }
    Ok(())
}
