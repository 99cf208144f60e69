#[derive(serde::Deserialize)]
pub(super) struct OrsDirectionsResponse {
    #[serde(default)]
    pub(super) routes: Vec<OrsRoute>,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsRoute {
    pub(super) summary: OrsSummary,
    pub(super) geometry: Option<String>,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsSummary {
    /// Metres. Omitted by ORS for zero-length routes.
    #[serde(default)]
    pub(super) distance: f64,
    /// Seconds. Omitted by ORS for zero-length routes.
    #[serde(default)]
    pub(super) duration: f64,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsGeocodeResponse {
    #[serde(default)]
    pub(super) features: Vec<OrsFeature>,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsFeature {
    pub(super) properties: OrsFeatureProperties,
    pub(super) geometry: OrsPointGeometry,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsFeatureProperties {
    pub(super) label: Option<String>,
    pub(super) name: Option<String>,
}

#[derive(serde::Deserialize)]
pub(super) struct OrsPointGeometry {
    /// `[lng, lat]`
    pub(super) coordinates: [f64; 2],
}
