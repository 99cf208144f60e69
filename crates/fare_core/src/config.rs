use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::routing::{
    RetryPolicy, RouteProviderKind, RoutingConfig, DEFAULT_ORS_ENDPOINT,
    DEFAULT_ROUTE_CACHE_CAPACITY, DEFAULT_ROUTE_CACHE_TTL,
};
use crate::store::store_file_path;

/// Application settings shared by every entry point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the store file.
    pub data_dir: PathBuf,
    pub ors_endpoint: String,
    /// Without a key the straight-line estimator is used.
    pub ors_api_key: Option<String>,
    pub route_cache_capacity: usize,
    pub route_cache_ttl: Duration,
    pub retry: RetryPolicy,
    pub straight_line_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            ors_endpoint: DEFAULT_ORS_ENDPOINT.to_string(),
            ors_api_key: None,
            route_cache_capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
            route_cache_ttl: DEFAULT_ROUTE_CACHE_TTL,
            retry: RetryPolicy::default(),
            straight_line_fallback: true,
        }
    }
}

impl AppConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_ors_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ors_endpoint = endpoint.into();
        self
    }

    /// Blank keys are treated as absent.
    pub fn with_ors_api_key(mut self, api_key: Option<String>) -> Self {
        self.ors_api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_route_cache(mut self, capacity: usize, ttl: Duration) -> Self {
        self.route_cache_capacity = capacity;
        self.route_cache_ttl = ttl;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_straight_line_fallback(mut self, enabled: bool) -> Self {
        self.straight_line_fallback = enabled;
        self
    }

    pub fn store_path(&self) -> PathBuf {
        store_file_path(Path::new(&self.data_dir))
    }

    /// Backend selection: ORS when a key is configured and the `ors` feature is
    /// compiled in, straight-line otherwise.
    pub fn route_provider_kind(&self) -> RouteProviderKind {
        match &self.ors_api_key {
            #[cfg(feature = "ors")]
            Some(api_key) => RouteProviderKind::Ors {
                endpoint: self.ors_endpoint.clone(),
                api_key: api_key.clone(),
            },
            #[cfg(not(feature = "ors"))]
            Some(_) => {
                tracing::debug!("ORS key configured but the ors feature is disabled");
                RouteProviderKind::StraightLine
            }
            None => RouteProviderKind::StraightLine,
        }
    }

    pub fn routing_config(&self) -> RoutingConfig {
        RoutingConfig {
            kind: self.route_provider_kind(),
            cache_capacity: self.route_cache_capacity,
            cache_ttl: self.route_cache_ttl,
            retry: self.retry.clone(),
            straight_line_fallback: self.straight_line_fallback,
        }
    }
}
