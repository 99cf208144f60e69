//! Hand-off to the provider's own app for the actual booking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[default]
    Android,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ios => "ios",
            Self::Android => "android",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            other => Err(format!("unknown platform '{other}' (expected ios or android)")),
        }
    }
}

/// Links for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingLinks {
    pub app_scheme: &'static str,
    pub website: &'static str,
    pub ios_store: &'static str,
    pub android_store: &'static str,
}

impl BookingLinks {
    pub fn store_url(&self, platform: Platform) -> &'static str {
        match platform {
            Platform::Ios => self.ios_store,
            Platform::Android => self.android_store,
        }
    }
}

const BOOKING_LINKS: &[(&str, BookingLinks)] = &[
    (
        "p1",
        BookingLinks {
            app_scheme: "ride://",
            website: "https://ride.et",
            ios_store: "https://apps.apple.com/app/ride-passenger-et/id1116499683",
            android_store: "https://play.google.com/store/apps/details?id=com.ride.passenger",
        },
    ),
    (
        "p2",
        BookingLinks {
            app_scheme: "yango://",
            website: "https://yango.com",
            ios_store: "https://apps.apple.com/app/yango-taxi/id1437157284",
            android_store: "https://play.google.com/store/apps/details?id=com.yandex.yango",
        },
    ),
    (
        "p3",
        BookingLinks {
            app_scheme: "feres://",
            website: "https://feres.et",
            ios_store: "https://apps.apple.com/app/feres-ethiopia/id1527339790",
            android_store: "https://play.google.com/store/apps/details?id=com.feres.passenger",
        },
    ),
];

pub fn booking_links(provider_id: &str) -> Option<&'static BookingLinks> {
    BOOKING_LINKS
        .iter()
        .find(|(id, _)| *id == provider_id)
        .map(|(_, links)| links)
}

/// URLs to try in order: the app if installed, otherwise the store listing,
/// then the website as a last resort.
pub fn booking_targets(
    provider_id: &str,
    platform: Platform,
    app_installed: bool,
) -> Option<Vec<&'static str>> {
    let links = booking_links(provider_id)?;
    let first = if app_installed {
        links.app_scheme
    } else {
        links.store_url(platform)
    };
    Some(vec![first, links.website])
}
