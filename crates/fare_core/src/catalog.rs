//! Provider catalog: pricing profiles for the competing ride-hailing services.
//!
//! The catalog has two tiers:
//!
//! - **Defaults**: [`default_catalog`], a process-wide constant set.
//! - **Calibration**: a user-edited list loaded from storage once per session.
//!
//! [`load_effective_catalog`] reconciles the two by provider id. The result is
//! a plain value the caller passes to the estimator; nothing here holds state.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Morning surge multiplier used when a profile has none (or a non-positive one).
pub const DEFAULT_MORNING_SURGE: f64 = 1.3;

/// Evening surge multiplier used when a profile has none (or a non-positive one).
pub const DEFAULT_EVENING_SURGE: f64 = 1.4;

/// Vehicle tier requested by the rider.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    #[default]
    Economy,
    Comfort,
    Van,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 3] = [Self::Economy, Self::Comfort, Self::Van];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Comfort => "comfort",
            Self::Van => "van",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(Self::Economy),
            "comfort" => Ok(Self::Comfort),
            "van" => Ok(Self::Van),
            other => Err(CatalogError::UnknownCategory(other.to_string())),
        }
    }
}

/// Per-category price multipliers. A category missing from the map is priced at 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMultipliers(BTreeMap<VehicleCategory, f64>);

impl CategoryMultipliers {
    pub fn new(economy: f64, comfort: f64, van: f64) -> Self {
        Self(BTreeMap::from([
            (VehicleCategory::Economy, economy),
            (VehicleCategory::Comfort, comfort),
            (VehicleCategory::Van, van),
        ]))
    }

    /// Used when neither a calibrated profile nor its default carries multipliers.
    pub fn fallback() -> Self {
        Self::new(1.0, 1.3, 1.8)
    }

    pub fn get(&self, category: VehicleCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(1.0)
    }

    pub fn set(&mut self, category: VehicleCategory, multiplier: f64) {
        self.0.insert(category, multiplier);
    }

    pub fn without(mut self, category: VehicleCategory) -> Self {
        self.0.remove(&category);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (VehicleCategory, f64)> + '_ {
        self.0.iter().map(|(category, multiplier)| (*category, *multiplier))
    }
}

/// Pricing profile of one competing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Stable join key between catalog, calibration and estimates.
    pub id: String,
    pub display_name: String,
    /// Brand colour, passed through to the presentation layer.
    pub color: String,
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub per_minute_rate: f64,
    /// Floor applied after surge, before the display band.
    pub minimum_fare: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_surge_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_surge_multiplier: Option<f64>,
    /// Estimated driver arrival time; display only.
    pub pickup_delay_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_multipliers: Option<CategoryMultipliers>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderProfile {
    /// A profile with the given id and all rates zeroed; fill in with the `with_*` helpers.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            color: String::new(),
            base_fare: 0.0,
            per_km_rate: 0.0,
            per_minute_rate: 0.0,
            minimum_fare: 0.0,
            morning_surge_multiplier: None,
            evening_surge_multiplier: None,
            pickup_delay_minutes: 0.0,
            category_multipliers: None,
            enabled: true,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_rates(mut self, base_fare: f64, per_km_rate: f64, per_minute_rate: f64) -> Self {
        self.base_fare = base_fare;
        self.per_km_rate = per_km_rate;
        self.per_minute_rate = per_minute_rate;
        self
    }

    pub fn with_minimum_fare(mut self, minimum_fare: f64) -> Self {
        self.minimum_fare = minimum_fare;
        self
    }

    pub fn with_surge(mut self, morning: f64, evening: f64) -> Self {
        self.morning_surge_multiplier = Some(morning);
        self.evening_surge_multiplier = Some(evening);
        self
    }

    pub fn with_pickup_delay(mut self, minutes: f64) -> Self {
        self.pickup_delay_minutes = minutes;
        self
    }

    pub fn with_category_multipliers(mut self, multipliers: CategoryMultipliers) -> Self {
        self.category_multipliers = Some(multipliers);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Multiplier for `category`; 1.0 when the profile has no entry for it.
    pub fn category_multiplier(&self, category: VehicleCategory) -> f64 {
        self.category_multipliers
            .as_ref()
            .map(|multipliers| multipliers.get(category))
            .unwrap_or(1.0)
    }

    pub fn morning_surge(&self) -> f64 {
        positive_or(self.morning_surge_multiplier, DEFAULT_MORNING_SURGE)
    }

    pub fn evening_surge(&self) -> f64 {
        positive_or(self.evening_surge_multiplier, DEFAULT_EVENING_SURGE)
    }

    /// Check the profile against the catalog schema.
    ///
    /// The estimator never calls this; it computes with whatever it is given.
    /// Validation guards calibration edits before they are persisted.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        let amounts = [
            ("base_fare", self.base_fare),
            ("per_km_rate", self.per_km_rate),
            ("per_minute_rate", self.per_minute_rate),
            ("minimum_fare", self.minimum_fare),
            ("pickup_delay_minutes", self.pickup_delay_minutes),
        ];
        for (field, value) in amounts {
            require_non_negative(&self.id, field, value)?;
        }

        for (field, value) in [
            ("morning_surge_multiplier", self.morning_surge_multiplier),
            ("evening_surge_multiplier", self.evening_surge_multiplier),
        ] {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(CatalogError::InvalidField {
                        provider_id: self.id.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        if let Some(multipliers) = &self.category_multipliers {
            for (_, value) in multipliers.iter() {
                require_non_negative(&self.id, "category_multipliers", value)?;
            }
        }

        Ok(())
    }
}

fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(multiplier) if multiplier > 0.0 => multiplier,
        _ => fallback,
    }
}

fn require_non_negative(provider_id: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidField {
            provider_id: provider_id.to_string(),
            field,
            value,
        })
    }
}

/// Errors raised while validating or editing a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("provider id must not be empty")]
    EmptyId,
    #[error("provider '{provider_id}': {field} must be a finite non-negative number, got {value}")]
    InvalidField {
        provider_id: String,
        field: &'static str,
        value: f64,
    },
    #[error("duplicate provider id '{0}'")]
    DuplicateId(String),
    #[error("unknown provider id '{0}'")]
    UnknownProvider(String),
    #[error("unknown vehicle category '{0}' (expected economy, comfort or van)")]
    UnknownCategory(String),
}

/// The built-in Addis Ababa provider set.
pub fn default_catalog() -> Vec<ProviderProfile> {
    vec![
        ProviderProfile::new("p1", "RIDE")
            .with_color("#FCD34D")
            .with_rates(130.0, 16.0, 3.0)
            .with_minimum_fare(80.0)
            .with_surge(DEFAULT_MORNING_SURGE, DEFAULT_EVENING_SURGE)
            .with_pickup_delay(4.0)
            .with_category_multipliers(CategoryMultipliers::new(1.0, 1.35, 2.0)),
        ProviderProfile::new("p2", "Yango")
            .with_color("#EF4444")
            .with_rates(92.0, 15.0, 2.2)
            .with_minimum_fare(70.0)
            .with_surge(DEFAULT_MORNING_SURGE, DEFAULT_EVENING_SURGE)
            .with_pickup_delay(2.0)
            .with_category_multipliers(CategoryMultipliers::new(1.0, 1.3, 1.8)),
        ProviderProfile::new("p3", "Feres")
            .with_color("#10B981")
            .with_rates(130.0, 16.0, 1.0)
            .with_minimum_fare(80.0)
            .with_surge(DEFAULT_MORNING_SURGE, DEFAULT_EVENING_SURGE)
            .with_pickup_delay(5.0)
            .with_category_multipliers(CategoryMultipliers::new(1.0, 1.25, 1.9)),
    ]
}

/// Merge a calibrated override list over the defaults.
///
/// - No override: the defaults, unchanged.
/// - Override ids unknown to the defaults are dropped (retired providers).
/// - Retained entries without category multipliers take the default's,
///   or [`CategoryMultipliers::fallback`].
/// - Output order follows the override list.
pub fn load_effective_catalog(
    defaults: &[ProviderProfile],
    override_profiles: Option<&[ProviderProfile]>,
) -> Vec<ProviderProfile> {
    let Some(override_profiles) = override_profiles else {
        return defaults.to_vec();
    };

    override_profiles
        .iter()
        .filter_map(|profile| {
            let default = find_profile(defaults, &profile.id)?;
            let mut merged = profile.clone();
            if merged.category_multipliers.is_none() {
                merged.category_multipliers = Some(
                    default
                        .category_multipliers
                        .clone()
                        .unwrap_or_else(CategoryMultipliers::fallback),
                );
            }
            Some(merged)
        })
        .collect()
}

pub fn find_profile<'a>(catalog: &'a [ProviderProfile], id: &str) -> Option<&'a ProviderProfile> {
    catalog.iter().find(|profile| profile.id == id)
}

/// Validate every profile and reject duplicate ids.
pub fn validate_catalog(catalog: &[ProviderProfile]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(catalog.len());
    for profile in catalog {
        profile.validate()?;
        if !seen.insert(profile.id.as_str()) {
            return Err(CatalogError::DuplicateId(profile.id.clone()));
        }
    }
    Ok(())
}

/// A single numeric field the user may calibrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationField {
    BaseFare,
    PerKmRate,
    PerMinuteRate,
    MinimumFare,
    MorningSurge,
    EveningSurge,
    PickupDelay,
}

impl FromStr for CalibrationField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "base_fare" => Ok(Self::BaseFare),
            "per_km" | "per_km_rate" => Ok(Self::PerKmRate),
            "per_min" | "per_minute" | "per_minute_rate" => Ok(Self::PerMinuteRate),
            "min_fare" | "minimum_fare" => Ok(Self::MinimumFare),
            "morning_surge" => Ok(Self::MorningSurge),
            "evening_surge" => Ok(Self::EveningSurge),
            "pickup_delay" => Ok(Self::PickupDelay),
            other => Err(format!("unknown calibration field '{other}'")),
        }
    }
}

/// One user edit, applied to the profile with the matching id.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationEdit {
    Set {
        provider_id: String,
        field: CalibrationField,
        value: f64,
    },
    SetCategoryMultiplier {
        provider_id: String,
        category: VehicleCategory,
        value: f64,
    },
    SetEnabled {
        provider_id: String,
        enabled: bool,
    },
}

impl CalibrationEdit {
    fn provider_id(&self) -> &str {
        match self {
            Self::Set { provider_id, .. }
            | Self::SetCategoryMultiplier { provider_id, .. }
            | Self::SetEnabled { provider_id, .. } => provider_id,
        }
    }
}

/// Apply an edit to a working copy of the catalog and re-validate the touched profile.
pub fn apply_calibration_edit(
    catalog: &mut [ProviderProfile],
    edit: &CalibrationEdit,
) -> Result<(), CatalogError> {
    let provider_id = edit.provider_id();
    let profile = catalog
        .iter_mut()
        .find(|profile| profile.id == provider_id)
        .ok_or_else(|| CatalogError::UnknownProvider(provider_id.to_string()))?;

    let mut candidate = profile.clone();
    match edit {
        CalibrationEdit::Set { field, value, .. } => match field {
            CalibrationField::BaseFare => candidate.base_fare = *value,
            CalibrationField::PerKmRate => candidate.per_km_rate = *value,
            CalibrationField::PerMinuteRate => candidate.per_minute_rate = *value,
            CalibrationField::MinimumFare => candidate.minimum_fare = *value,
            CalibrationField::MorningSurge => candidate.morning_surge_multiplier = Some(*value),
            CalibrationField::EveningSurge => candidate.evening_surge_multiplier = Some(*value),
            CalibrationField::PickupDelay => candidate.pickup_delay_minutes = *value,
        },
        CalibrationEdit::SetCategoryMultiplier { category, value, .. } => {
            candidate
                .category_multipliers
                .get_or_insert_with(CategoryMultipliers::fallback)
                .set(*category, *value);
        }
        CalibrationEdit::SetEnabled { enabled, .. } => candidate.enabled = *enabled,
    }

    candidate.validate()?;
    *profile = candidate;
    Ok(())
}
