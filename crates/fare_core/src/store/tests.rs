use std::fs;
use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use super::file::load_document;
use super::*;
use crate::catalog::{default_catalog, CatalogError};

fn store_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = store_file_path(dir.path());
    (dir, path)
}

fn at(seconds: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp") + Duration::seconds(seconds)
}

#[test]
fn missing_file_reads_as_empty_document() {
    let (_dir, path) = store_path();
    let document = load_document(&path).expect("missing file is not an error");
    assert_eq!(document.version, STORE_FILE_VERSION);
    assert!(document.calibration.is_none());
    assert!(load_calibration(&path, &default_catalog())
        .expect("load")
        .is_none());
    assert!(load_recent_searches(&path).expect("load").is_empty());
}

#[test]
fn malformed_json_is_reported_as_invalid_format() {
    let (_dir, path) = store_path();
    fs::write(&path, "{ definitely-not-json ").expect("fixture should be written");

    assert!(matches!(
        load_favorites(&path),
        Err(StoreError::InvalidFormat(_))
    ));
}

#[test]
fn unsupported_version_is_rejected() {
    let (_dir, path) = store_path();
    fs::write(&path, r#"{ "version": 99, "recent_searches": [] }"#).expect("fixture");

    assert!(matches!(
        load_recent_searches(&path),
        Err(StoreError::InvalidFormat(_))
    ));
}

#[test]
fn calibration_round_trips() {
    let (_dir, path) = store_path();
    let mut catalog = default_catalog();
    catalog[1].base_fare = 99.0;
    catalog[2].enabled = false;

    save_calibration(&path, &catalog).expect("save");
    let loaded = load_calibration(&path, &default_catalog())
        .expect("load")
        .expect("calibration stored");
    assert_eq!(loaded, catalog);

    clear_calibration(&path).expect("clear");
    assert!(load_calibration(&path, &default_catalog())
        .expect("load")
        .is_none());
}

#[test]
fn partial_entries_are_filled_from_defaults() {
    let (_dir, path) = store_path();
    fs::write(
        &path,
        r#"{
            "version": 1,
            "calibration": [
                { "id": "p2", "base_fare": 120.0 },
                { "id": "p9", "base_fare": 10.0 }
            ]
        }"#,
    )
    .expect("fixture");

    let defaults = default_catalog();
    let loaded = load_calibration(&path, &defaults)
        .expect("load")
        .expect("calibration stored");

    assert_eq!(loaded.len(), 1, "incomplete unknown entry is skipped");
    let yango = &loaded[0];
    assert_eq!(yango.id, "p2");
    assert_eq!(yango.base_fare, 120.0);
    assert_eq!(yango.per_km_rate, defaults[1].per_km_rate);
    assert_eq!(yango.minimum_fare, defaults[1].minimum_fare);
    assert_eq!(yango.display_name, "Yango");
    assert!(yango.enabled);
    assert!(yango.category_multipliers.is_none());
}

#[test]
fn invalid_calibration_is_not_written() {
    let (_dir, path) = store_path();
    let mut catalog = default_catalog();
    catalog[0].per_km_rate = -1.0;

    let result = save_calibration(&path, &catalog);
    assert!(matches!(
        result,
        Err(StoreError::InvalidCatalog(CatalogError::InvalidField { .. }))
    ));
    assert!(!path.exists());
}

#[test]
fn favorites_default_until_stored() {
    let (_dir, path) = store_path();
    let defaults = load_favorites(&path).expect("load");
    let labels: Vec<_> = defaults.iter().map(|favorite| favorite.label.as_str()).collect();
    assert_eq!(labels, vec!["Work", "Home", "Gym"]);

    let added = add_favorite(&path, "School", "Piassa", "6 Kilo", "star", at(0)).expect("add");
    assert_eq!(added.id, at(0).timestamp_millis().to_string());

    let favorites = load_favorites(&path).expect("load");
    assert_eq!(favorites.len(), 4);
    assert_eq!(favorites[0], added);

    assert_eq!(
        remove_favorite(&path, "2").expect("remove"),
        RemoveFavoriteOutcome::Removed
    );
    assert_eq!(
        remove_favorite(&path, "missing").expect("remove"),
        RemoveFavoriteOutcome::NotFound
    );
    let ids: Vec<_> = load_favorites(&path)
        .expect("load")
        .into_iter()
        .map(|favorite| favorite.id)
        .collect();
    assert_eq!(ids, vec![added.id.clone(), "1".to_string(), "3".to_string()]);
}

#[test]
fn recent_searches_are_deduplicated_and_capped() {
    let (_dir, path) = store_path();
    for (offset, pickup) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
        push_recent_search(&path, pickup, "Bole", at(offset as i64)).expect("push");
    }

    let recents = load_recent_searches(&path).expect("load");
    let pickups: Vec<_> = recents.iter().map(|search| search.pickup.as_str()).collect();
    assert_eq!(pickups, vec!["F", "E", "D", "C", "B"]);

    let recents = push_recent_search(&path, "D", "Bole", at(100)).expect("push");
    let pickups: Vec<_> = recents.iter().map(|search| search.pickup.as_str()).collect();
    assert_eq!(pickups, vec!["D", "F", "E", "C", "B"]);
    assert_eq!(recents[0].id, at(100).timestamp_millis().to_string());
    assert_eq!(recents[0].searched_at, at(100));
}

#[test]
fn writes_preserve_other_sections() {
    let (_dir, path) = store_path();
    save_calibration(&path, &default_catalog()).expect("save");
    push_recent_search(&path, "Megenagna", "Piassa", at(0)).expect("push");
    add_favorite(&path, "Saved", "Ayat", "CMC", "star", at(1)).expect("add");

    assert!(load_calibration(&path, &default_catalog())
        .expect("load")
        .is_some());
    assert_eq!(load_recent_searches(&path).expect("load").len(), 1);
    assert_eq!(load_favorites(&path).expect("load").len(), 4);
}

#[test]
fn side_effect_writes_leave_a_malformed_file_alone() {
    let (_dir, path) = store_path();
    fs::write(&path, "not json").expect("fixture");

    assert!(matches!(
        push_recent_search(&path, "Lebu", "Lafto", at(0)),
        Err(StoreError::InvalidFormat(_))
    ));
    assert!(matches!(
        add_favorite(&path, "Saved", "Ayat", "CMC", "star", at(1)),
        Err(StoreError::InvalidFormat(_))
    ));
    assert!(matches!(
        remove_favorite(&path, "1"),
        Err(StoreError::InvalidFormat(_))
    ));
    assert!(matches!(
        clear_calibration(&path),
        Err(StoreError::InvalidFormat(_))
    ));
    assert_eq!(fs::read_to_string(&path).expect("read"), "not json");
}

#[test]
fn explicit_calibration_save_replaces_a_malformed_file() {
    let (_dir, path) = store_path();
    fs::write(&path, "not json").expect("fixture");

    save_calibration(&path, &default_catalog()).expect("save over malformed file");
    assert_eq!(
        load_calibration(&path, &default_catalog()).expect("load"),
        Some(default_catalog())
    );
}

#[test]
fn unreadable_calibration_entry_is_skipped_and_survives_other_writes() {
    let (_dir, path) = store_path();
    fs::write(
        &path,
        r#"{
            "version": 1,
            "calibration": [
                { "id": "p1", "category_multipliers": { "economy": 1.0, "limo": 2.5 } },
                { "id": "p3", "base_fare": "cheap" },
                { "id": "p2", "base_fare": 10.0 }
            ]
        }"#,
    )
    .expect("fixture");

    let defaults = default_catalog();
    let ids = |profiles: Vec<crate::catalog::ProviderProfile>| -> Vec<String> {
        profiles.into_iter().map(|profile| profile.id).collect()
    };

    let loaded = load_calibration(&path, &defaults)
        .expect("bad entries do not fail the load")
        .expect("calibration stored");
    assert_eq!(ids(loaded.clone()), vec!["p2".to_string()]);
    assert_eq!(loaded[0].base_fare, 10.0);

    push_recent_search(&path, "Piassa", "Bole", at(0)).expect("push");
    add_favorite(&path, "Saved", "Ayat", "CMC", "star", at(1)).expect("add");

    let reloaded = load_calibration(&path, &defaults)
        .expect("load")
        .expect("calibration still stored");
    assert_eq!(reloaded, loaded);
    assert_eq!(load_recent_searches(&path).expect("load").len(), 1);

    let raw = load_document(&path).expect("document");
    assert_eq!(raw.calibration.map(|entries| entries.len()), Some(3));
}
