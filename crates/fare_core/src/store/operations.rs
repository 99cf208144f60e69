use std::path::Path;

use chrono::{DateTime, Utc};

use super::file::{load_document, load_document_for_overwrite, save_document_atomic};
use super::model::{default_favorites, Favorite, RecentSearch, StoredProfile};
use super::{RemoveFavoriteOutcome, StoreError, MAX_RECENT_SEARCHES};
use crate::catalog::{find_profile, validate_catalog, ProviderProfile};

/// Stored calibration with absent fields filled from `defaults`.
///
/// `Ok(None)` means the user never calibrated. Entries that do not decode, or
/// cannot be completed (unknown id and missing fields), are skipped with a warning.
pub fn load_calibration(
    path: &Path,
    defaults: &[ProviderProfile],
) -> Result<Option<Vec<ProviderProfile>>, StoreError> {
    let document = load_document(path)?;
    let Some(stored) = document.calibration else {
        return Ok(None);
    };

    let profiles = stored
        .into_iter()
        .filter_map(|raw| {
            let entry = match serde_json::from_value::<StoredProfile>(raw) {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable stored profile");
                    return None;
                }
            };
            let id = entry.id.clone();
            let profile = entry.into_profile(find_profile(defaults, &id));
            if profile.is_none() {
                tracing::warn!(provider_id = %id, "skipping incomplete stored profile");
            }
            profile
        })
        .collect();
    Ok(Some(profiles))
}

/// Persist a full calibrated catalog. Invalid catalogs are rejected before writing.
///
/// This is the only write that replaces an unreadable store file.
pub fn save_calibration(path: &Path, profiles: &[ProviderProfile]) -> Result<(), StoreError> {
    validate_catalog(profiles)?;

    let entries = profiles
        .iter()
        .map(|profile| serde_json::to_value(StoredProfile::from(profile)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| StoreError::Io(format!("failed to serialize calibration: {error}")))?;

    let mut document = load_document_for_overwrite(path)?;
    document.calibration = Some(entries);
    save_document_atomic(path, &document)
}

/// Forget the calibration; the defaults apply again.
pub fn clear_calibration(path: &Path) -> Result<(), StoreError> {
    let mut document = load_document(path)?;
    if document.calibration.take().is_none() {
        return Ok(());
    }
    save_document_atomic(path, &document)
}

/// Stored favourites, or [`default_favorites`] when none are stored.
pub fn load_favorites(path: &Path) -> Result<Vec<Favorite>, StoreError> {
    let document = load_document(path)?;
    Ok(favorites_or_defaults(document.favorites))
}

fn favorites_or_defaults(favorites: Option<Vec<Favorite>>) -> Vec<Favorite> {
    match favorites {
        Some(favorites) if !favorites.is_empty() => favorites,
        _ => default_favorites(),
    }
}

/// Prepend a favourite. The list it is added to includes the defaults if
/// nothing was stored yet.
pub fn add_favorite(
    path: &Path,
    label: &str,
    pickup: &str,
    dropoff: &str,
    icon: &str,
    now: DateTime<Utc>,
) -> Result<Favorite, StoreError> {
    let mut document = load_document(path)?;
    let favorite = Favorite {
        id: now.timestamp_millis().to_string(),
        label: label.to_string(),
        pickup: pickup.to_string(),
        dropoff: dropoff.to_string(),
        icon: icon.to_string(),
    };

    let mut favorites = favorites_or_defaults(document.favorites.take());
    favorites.insert(0, favorite.clone());
    document.favorites = Some(favorites);

    save_document_atomic(path, &document)?;
    Ok(favorite)
}

pub fn remove_favorite(path: &Path, id: &str) -> Result<RemoveFavoriteOutcome, StoreError> {
    let mut document = load_document(path)?;
    let mut favorites = favorites_or_defaults(document.favorites.take());
    let initial_len = favorites.len();
    favorites.retain(|favorite| favorite.id != id);

    if favorites.len() == initial_len {
        return Ok(RemoveFavoriteOutcome::NotFound);
    }

    document.favorites = Some(favorites);
    save_document_atomic(path, &document)?;
    Ok(RemoveFavoriteOutcome::Removed)
}

/// Recent searches, newest first.
pub fn load_recent_searches(path: &Path) -> Result<Vec<RecentSearch>, StoreError> {
    Ok(load_document(path)?.recent_searches)
}

/// Record a search at the front of the list, replacing an older entry for the
/// same pickup and dropoff, and keep at most [`MAX_RECENT_SEARCHES`].
pub fn push_recent_search(
    path: &Path,
    pickup: &str,
    dropoff: &str,
    now: DateTime<Utc>,
) -> Result<Vec<RecentSearch>, StoreError> {
    let mut document = load_document(path)?;

    let mut recents = Vec::with_capacity(MAX_RECENT_SEARCHES);
    recents.push(RecentSearch {
        id: now.timestamp_millis().to_string(),
        pickup: pickup.to_string(),
        dropoff: dropoff.to_string(),
        searched_at: now,
    });
    recents.extend(
        document
            .recent_searches
            .into_iter()
            .filter(|search| !(search.pickup == pickup && search.dropoff == dropoff)),
    );
    recents.truncate(MAX_RECENT_SEARCHES);

    document.recent_searches = recents.clone();
    save_document_atomic(path, &document)?;
    Ok(recents)
}
