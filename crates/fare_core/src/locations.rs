//! Built-in Addis Ababa place table and name resolution.

use h3o::LatLng;

/// A well-known place with search keywords.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub keywords: &'static [&'static str],
}

impl Place {
    pub fn coordinate(&self) -> Option<LatLng> {
        LatLng::new(self.lat, self.lng).ok()
    }
}

const fn place(name: &'static str, lat: f64, lng: f64, keywords: &'static [&'static str]) -> Place {
    Place {
        name,
        lat,
        lng,
        keywords,
    }
}

pub const STATIC_PLACES: &[Place] = &[
    // Hubs
    place("Bole International Airport", 8.9778, 38.7993, &["airport", "terminal", "fly"]),
    place("Meskel Square", 9.0104, 38.7613, &["center", "stadium"]),
    place("Mexico Square", 9.0103, 38.7454, &["transport"]),
    place("Piassa (Piazza)", 9.0305, 38.7400, &["old town", "churchill"]),
    place("Megenagna", 9.0205, 38.8011, &["terminal", "east"]),
    place("Kazanchis", 9.0184, 38.7674, &["hotels", "un", "eca"]),
    place("4 Kilo", 9.0333, 38.7505, &["palace", "parliament", "university"]),
    place("6 Kilo", 9.0409, 38.7607, &["university", "museum"]),
    // Bole area
    place("Bole Medhanialem", 8.9934, 38.7865, &["church", "camara"]),
    place("Edna Mall", 8.9944, 38.7884, &["cinema", "matti"]),
    place("Friendship Park", 9.0160, 38.7595, &["park", "palace"]),
    place("Bole Atlas", 9.0020, 38.7850, &["hotel"]),
    place("22 Mazoria", 9.0225, 38.7955, &["golagul", "zeret"]),
    place("Olympia", 8.9980, 38.7680, &["dembel"]),
    place("Bambis", 9.0150, 38.7550, &["supermarket"]),
    place("Hayahulet", 9.0220, 38.7950, &["hospital"]),
    // Residential / suburbs
    place("CMC St. Michael", 9.0195, 38.8205, &["train", "tsehay"]),
    place("Ayat", 9.0505, 38.8305, &["train", "village"]),
    place("Summit", 8.9855, 38.7755, &["condo", "soft drink"]),
    place("Gerji", 8.9805, 38.8105, &["unity", "taxi"]),
    place("Jemo 1", 8.9275, 38.7005, &["condo"]),
    place("Lebu", 8.9305, 38.7205, &["varnero", "music"]),
    place("Lafto", 8.9505, 38.7405, &["mall"]),
    place("Sarbet", 8.9955, 38.7305, &["canada", "vatican", "mekanisa"]),
    place("Bisrate Gabriel", 8.9880, 38.7350, &["church", "tvet"]),
    place("Gotera", 8.9905, 38.7555, &["interchange", "pepsi"]),
    // West / north
    place("Lideta", 9.0155, 38.7355, &["condo", "court", "church"]),
    place("Tor Hailoch", 9.0180, 38.7250, &["hospital"]),
    place("Kolfe", 9.0105, 38.7105, &["18", "police"]),
    place("Merkato", 9.0304, 38.7305, &["market", "bus"]),
    place("Shiro Meda", 9.0550, 38.7650, &["embassy", "market"]),
    place("Entoto Park", 9.0750, 38.7650, &["park", "mountain"]),
];

const MAX_SEARCH_RESULTS: usize = 5;

/// Used when a pickup name resolves to nothing (Mexico Square area).
pub const DEFAULT_PICKUP: (f64, f64) = (9.010, 38.745);

/// Used when a dropoff name resolves to nothing (Bole).
pub const DEFAULT_DROPOFF: (f64, f64) = (8.995, 38.790);

/// Which end of the trip a name refers to; selects the default coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEnd {
    Pickup,
    Dropoff,
}

/// Case-insensitive substring search over names and keywords, at most 5 matches.
pub fn search_static_locations(query: &str) -> Vec<&'static Place> {
    if query.is_empty() {
        return Vec::new();
    }
    let q = query.to_lowercase();
    STATIC_PLACES
        .iter()
        .filter(|place| {
            place.name.to_lowercase().contains(&q)
                || place.keywords.iter().any(|keyword| keyword.contains(&q))
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

/// Look a place up by name: exact match first, then an approximate one.
///
/// Approximate means either name contains the other, or one of the place's
/// keywords appears in the query.
pub fn find_coordinates(name: &str) -> Option<LatLng> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let exact = STATIC_PLACES
        .iter()
        .find(|place| place.name.to_lowercase() == wanted);
    let found = exact.or_else(|| {
        STATIC_PLACES.iter().find(|place| {
            let candidate = place.name.to_lowercase();
            candidate.contains(&wanted)
                || wanted.contains(&candidate)
                || place.keywords.iter().any(|keyword| wanted.contains(keyword))
        })
    })?;

    found.coordinate()
}

/// Coordinates for one end of a trip: explicit coordinates, then the place table,
/// then the default for that end.
pub fn resolve_endpoint(name: &str, explicit: Option<LatLng>, end: TripEnd) -> LatLng {
    if let Some(coordinate) = explicit {
        return coordinate;
    }
    if let Some(coordinate) = find_coordinates(name) {
        return coordinate;
    }

    tracing::debug!(name, ?end, "unknown place, using default coordinate");
    default_coordinate(end)
}

fn default_coordinate(end: TripEnd) -> LatLng {
    let (lat, lng) = match end {
        TripEnd::Pickup => DEFAULT_PICKUP,
        TripEnd::Dropoff => DEFAULT_DROPOFF,
    };
    LatLng::new(lat, lng).expect("DEFAULT_PICKUP and DEFAULT_DROPOFF should be valid coordinates")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_coordinates_are_valid() {
        assert_eq!(STATIC_PLACES.len(), 32);
        assert!(STATIC_PLACES.iter().all(|place| place.coordinate().is_some()));
    }

    #[test]
    fn default_coordinates_match_their_constants() {
        let pickup = default_coordinate(TripEnd::Pickup);
        assert_eq!((pickup.lat(), pickup.lng()), DEFAULT_PICKUP);
        let dropoff = default_coordinate(TripEnd::Dropoff);
        assert_eq!((dropoff.lat(), dropoff.lng()), DEFAULT_DROPOFF);
    }

    #[test]
    fn search_matches_names_and_keywords() {
        let names: Vec<_> = search_static_locations("Bole")
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(
            names,
            vec!["Bole International Airport", "Bole Medhanialem", "Bole Atlas"]
        );

        let by_keyword: Vec<_> = search_static_locations("hospital")
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(by_keyword, vec!["Hayahulet", "Tor Hailoch"]);
    }

    #[test]
    fn search_caps_results() {
        // "a" appears in most names.
        assert_eq!(search_static_locations("a").len(), 5);
        assert!(search_static_locations("").is_empty());
    }

    #[test]
    fn find_prefers_exact_match() {
        let coordinate = find_coordinates("  megenagna ").expect("known place");
        assert_eq!(coordinate.lat(), 9.0205);
        assert_eq!(coordinate.lng(), 38.8011);
    }

    #[test]
    fn find_falls_back_to_approximate_match() {
        // Query contains the keyword "airport".
        let coordinate = find_coordinates("the airport please").expect("keyword match");
        assert_eq!(coordinate.lat(), 8.9778);

        // Name contains the query.
        let coordinate = find_coordinates("Mexico").expect("partial name match");
        assert_eq!(coordinate.lng(), 38.7454);
    }

    #[test]
    fn resolve_uses_explicit_then_table_then_default() {
        let explicit = LatLng::new(9.1, 38.9).expect("valid");
        assert_eq!(
            resolve_endpoint("Meskel Square", Some(explicit), TripEnd::Pickup),
            explicit
        );
        assert_eq!(
            resolve_endpoint("Meskel Square", None, TripEnd::Pickup).lat(),
            9.0104
        );
        assert_eq!(
            resolve_endpoint("Nowhere Street", None, TripEnd::Dropoff).lat(),
            DEFAULT_DROPOFF.0
        );
    }
}
