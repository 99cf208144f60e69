use super::parser::{parse_directions_response, parse_geocode_response};
use super::response::{OrsDirectionsResponse, OrsGeocodeResponse};
use crate::routing::{CandidateSource, RouteError};

#[test]
fn parse_directions_rounds_summary() {
    let response: OrsDirectionsResponse = serde_json::from_str(
        r#"{"routes":[{"summary":{"distance":8234.6,"duration":1130.2},"geometry":"u{~vFvyys@fS]"}]}"#,
    )
    .expect("fixture should deserialize");

    let route = parse_directions_response(response).expect("should parse");
    assert_eq!(route.distance_km, 8.2);
    assert_eq!(route.duration_min, 19.0);
    assert_eq!(route.polyline.as_deref(), Some("u{~vFvyys@fS]"));
}

#[test]
fn parse_directions_accepts_empty_summary() {
    let response: OrsDirectionsResponse =
        serde_json::from_str(r#"{"routes":[{"summary":{},"geometry":""}]}"#)
            .expect("fixture should deserialize");

    let route = parse_directions_response(response).expect("should parse");
    assert_eq!(route.distance_km, 0.0);
    assert_eq!(route.duration_min, 0.0);
    assert_eq!(route.polyline, None);
}

#[test]
fn parse_directions_without_routes_is_no_route() {
    let response: OrsDirectionsResponse =
        serde_json::from_str(r#"{"routes":[]}"#).expect("fixture should deserialize");
    assert_eq!(parse_directions_response(response), Err(RouteError::NoRoute));
}

#[test]
fn parse_geocode_swaps_lng_lat_and_skips_unnamed() {
    let response: OrsGeocodeResponse = serde_json::from_str(
        r#"{"features":[
            {"properties":{"label":"Edna Mall, Addis Ababa"},"geometry":{"coordinates":[38.7884,8.9944]}},
            {"properties":{"label":" "},"geometry":{"coordinates":[38.7,9.0]}},
            {"properties":{"name":"Meskel Square"},"geometry":{"coordinates":[38.7613,9.0104]}}
        ]}"#,
    )
    .expect("fixture should deserialize");

    let candidates = parse_geocode_response(response);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name, "Edna Mall, Addis Ababa");
    assert_eq!(candidates[0].lat, 8.9944);
    assert_eq!(candidates[0].lng, 38.7884);
    assert_eq!(candidates[0].source, CandidateSource::Remote);
    assert_eq!(candidates[1].name, "Meskel Square");
}
