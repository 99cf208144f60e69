use super::response::{OrsDirectionsResponse, OrsGeocodeResponse};
use crate::routing::{round_route, CandidateSource, LocationCandidate, RouteError, RouteResult};

pub(super) fn parse_directions_response(
    resp: OrsDirectionsResponse,
) -> Result<RouteResult, RouteError> {
    let route = resp.routes.into_iter().next().ok_or(RouteError::NoRoute)?;

    let summary = route.summary;
    if !summary.distance.is_finite() || !summary.duration.is_finite() {
        return Err(RouteError::InvalidResponse(
            "route summary contains non-finite values".to_string(),
        ));
    }

    let (distance_km, duration_min) = round_route(summary.distance, summary.duration);
    let polyline = route.geometry.filter(|geometry| !geometry.is_empty());

    Ok(RouteResult {
        distance_km,
        duration_min,
        polyline,
    })
}

pub(super) fn parse_geocode_response(resp: OrsGeocodeResponse) -> Vec<LocationCandidate> {
    resp.features
        .into_iter()
        .filter_map(|feature| {
            let name = feature
                .properties
                .label
                .or(feature.properties.name)
                .filter(|name| !name.trim().is_empty())?;
            let [lng, lat] = feature.geometry.coordinates;
            Some(LocationCandidate {
                name,
                lat,
                lng,
                source: CandidateSource::Remote,
            })
        })
        .collect()
}
