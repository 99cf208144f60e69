use std::time::Duration;

use h3o::LatLng;
use reqwest::{blocking::Client, Url};
use serde_json::json;

use super::parser::{parse_directions_response, parse_geocode_response};
use super::response::{OrsDirectionsResponse, OrsGeocodeResponse};
use crate::routing::{Geocoder, LocationCandidate, RouteError, RouteProvider, RouteResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Queries shorter than this go to the static place table only.
const MIN_GEOCODE_QUERY_CHARS: usize = 3;
const MAX_GEOCODE_RESULTS: &str = "5";

/// Addis Ababa bounding box: (min_lon, min_lat, max_lon, max_lat).
const SEARCH_BOUNDS: (f64, f64, f64, f64) = (38.65, 8.85, 38.95, 9.10);

/// Thin blocking HTTP client for the OpenRouteService API.
#[derive(Debug, Clone)]
pub struct OrsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OrsClient {
    /// Create a client for `endpoint` (e.g. [`DEFAULT_ORS_ENDPOINT`](crate::routing::DEFAULT_ORS_ENDPOINT)) authenticated with `api_key`.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, RouteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| RouteError::Network(format!("failed to build ORS client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, RouteError> {
        Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|err| RouteError::InvalidResponse(format!("failed to build ORS URL: {err}")))
    }
}

fn ensure_success(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, RouteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    Err(RouteError::Http {
        status: status.as_u16(),
        message,
    })
}

impl RouteProvider for OrsClient {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError> {
        let url = self.url("/v2/directions/driving-car")?;
        // ORS expects [longitude, latitude].
        let body = json!({
            "coordinates": [
                [origin.lng(), origin.lat()],
                [destination.lng(), destination.lat()],
            ]
        });

        let response = self
            .client
            .post(url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()?;

        let parsed: OrsDirectionsResponse = ensure_success(response)?.json()?;
        parse_directions_response(parsed)
    }
}

impl Geocoder for OrsClient {
    fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, RouteError> {
        let query = query.trim();
        if query.chars().count() < MIN_GEOCODE_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let (min_lon, min_lat, max_lon, max_lat) = SEARCH_BOUNDS;
        let mut url = self.url("/geocode/search")?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("text", query)
            .append_pair("boundary.rect.min_lon", &min_lon.to_string())
            .append_pair("boundary.rect.min_lat", &min_lat.to_string())
            .append_pair("boundary.rect.max_lon", &max_lon.to_string())
            .append_pair("boundary.rect.max_lat", &max_lat.to_string())
            .append_pair("size", MAX_GEOCODE_RESULTS);

        let response = self.client.get(url).send()?;
        let parsed: OrsGeocodeResponse = ensure_success(response)?.json()?;
        Ok(parse_geocode_response(parsed))
    }
}
