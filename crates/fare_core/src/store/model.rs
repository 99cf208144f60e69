use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::STORE_FILE_VERSION;
use crate::catalog::{CategoryMultipliers, ProviderProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct StoreDocumentV1 {
    pub(super) version: u32,
    /// Raw entries; each is decoded on its own so one bad entry cannot hide the rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) calibration: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) favorites: Option<Vec<Favorite>>,
    #[serde(default)]
    pub(super) recent_searches: Vec<RecentSearch>,
}

impl StoreDocumentV1 {
    pub(super) fn empty() -> Self {
        Self {
            version: STORE_FILE_VERSION,
            calibration: None,
            favorites: None,
            recent_searches: Vec::new(),
        }
    }
}

/// A calibrated profile as stored on disk. Every field but `id` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_km_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_minute_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_surge_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_surge_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_delay_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_multipliers: Option<CategoryMultipliers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl From<&ProviderProfile> for StoredProfile {
    fn from(profile: &ProviderProfile) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: Some(profile.display_name.clone()),
            color: Some(profile.color.clone()),
            base_fare: Some(profile.base_fare),
            per_km_rate: Some(profile.per_km_rate),
            per_minute_rate: Some(profile.per_minute_rate),
            minimum_fare: Some(profile.minimum_fare),
            morning_surge_multiplier: profile.morning_surge_multiplier,
            evening_surge_multiplier: profile.evening_surge_multiplier,
            pickup_delay_minutes: Some(profile.pickup_delay_minutes),
            category_multipliers: profile.category_multipliers.clone(),
            enabled: Some(profile.enabled),
        }
    }
}

impl StoredProfile {
    /// Fill absent fields from `default`.
    ///
    /// Without a default, the rate fields and display name must all be present;
    /// otherwise `None` is returned.
    pub fn into_profile(self, default: Option<&ProviderProfile>) -> Option<ProviderProfile> {
        match default {
            Some(default) => Some(ProviderProfile {
                id: self.id,
                display_name: self
                    .display_name
                    .unwrap_or_else(|| default.display_name.clone()),
                color: self.color.unwrap_or_else(|| default.color.clone()),
                base_fare: self.base_fare.unwrap_or(default.base_fare),
                per_km_rate: self.per_km_rate.unwrap_or(default.per_km_rate),
                per_minute_rate: self.per_minute_rate.unwrap_or(default.per_minute_rate),
                minimum_fare: self.minimum_fare.unwrap_or(default.minimum_fare),
                morning_surge_multiplier: self
                    .morning_surge_multiplier
                    .or(default.morning_surge_multiplier),
                evening_surge_multiplier: self
                    .evening_surge_multiplier
                    .or(default.evening_surge_multiplier),
                pickup_delay_minutes: self
                    .pickup_delay_minutes
                    .unwrap_or(default.pickup_delay_minutes),
                category_multipliers: self.category_multipliers,
                enabled: self.enabled.unwrap_or(default.enabled),
            }),
            None => Some(ProviderProfile {
                display_name: self.display_name?,
                color: self.color.unwrap_or_default(),
                base_fare: self.base_fare?,
                per_km_rate: self.per_km_rate?,
                per_minute_rate: self.per_minute_rate?,
                minimum_fare: self.minimum_fare?,
                morning_surge_multiplier: self.morning_surge_multiplier,
                evening_surge_multiplier: self.evening_surge_multiplier,
                pickup_delay_minutes: self.pickup_delay_minutes.unwrap_or(0.0),
                category_multipliers: self.category_multipliers,
                enabled: self.enabled.unwrap_or(true),
                id: self.id,
            }),
        }
    }
}

/// A saved pickup/dropoff pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub label: String,
    pub pickup: String,
    pub dropoff: String,
    pub icon: String,
}

impl Favorite {
    fn new(id: &str, label: &str, pickup: &str, dropoff: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            pickup: pickup.to_string(),
            dropoff: dropoff.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Shown until the user has stored favourites of their own.
pub fn default_favorites() -> Vec<Favorite> {
    vec![
        Favorite::new("1", "Work", "Bole", "Mexico", "briefcase"),
        Favorite::new("2", "Home", "CMC", "Bole Airport", "home"),
        Favorite::new("3", "Gym", "Meskel Square", "Kazanchis", "heart"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    /// Milliseconds since the epoch at the time of the search.
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub searched_at: DateTime<Utc>,
}
